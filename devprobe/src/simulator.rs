use anyhow::{Context, Result};
use glob::{MatchOptions, glob_with};
use plist::{Dictionary, Value};
use std::path::{Path, PathBuf};

use crate::model::{DeviceRecord, UNKNOWN};

/// Per-simulator metadata file inside each simulator directory.
pub const DEVICE_PLIST: &str = "device.plist";

/// Storage location relative to the user's home directory.
pub const CORE_SIMULATOR_DEVICES: &str = "Library/Developer/CoreSimulator/Devices";

pub trait SimulatorStore {
    /// Immediate, non-hidden subdirectories of the store.
    fn list_directories(&self) -> Result<Vec<PathBuf>>;

    /// Top-level dictionary of a property list, or `None` when the file is
    /// missing, malformed, or not a dictionary.
    fn read_property_list(&self, path: &Path) -> Option<Dictionary>;
}

/// Xcode's on-disk simulator registry.
#[derive(Debug, Clone)]
pub struct CoreSimulatorStore {
    root: PathBuf,
}

impl CoreSimulatorStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SimulatorStore for CoreSimulatorStore {
    fn list_directories(&self) -> Result<Vec<PathBuf>> {
        let meta = std::fs::metadata(&self.root)
            .with_context(|| format!("cannot stat {}", self.root.display()))?;
        anyhow::ensure!(meta.is_dir(), "{} is not a directory", self.root.display());

        let root = self
            .root
            .to_str()
            .with_context(|| format!("non UTF-8 path {}", self.root.display()))?;
        let pattern = format!("{}/*", glob::Pattern::escape(root));
        let opts = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut dirs = Vec::new();
        for entry in glob_with(&pattern, opts)? {
            let Ok(path) = entry else { continue };
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn read_property_list(&self, path: &Path) -> Option<Dictionary> {
        match Value::from_file(path) {
            Ok(value) => value.into_dictionary(),
            Err(err) => {
                log::debug!("{}: unreadable property list: {err}", path.display());
                None
            }
        }
    }
}

/// Build a simulator record from its `device.plist`.
///
/// Missing keys and keys with a non-string value fall back to `Unknown`,
/// except the UDID which falls back to the directory name.
pub fn simulator_from_plist(dir_name: &str, dict: &Dictionary) -> DeviceRecord {
    let text = |key: &str| dict.get(key).and_then(Value::as_string).map(str::to_owned);

    DeviceRecord::simulator(
        text("name").unwrap_or_else(|| UNKNOWN.to_owned()),
        text("UDID").unwrap_or_else(|| dir_name.to_owned()),
        text("runtime").unwrap_or_else(|| UNKNOWN.to_owned()),
        text("state").unwrap_or_else(|| UNKNOWN.to_owned()),
        text("deviceType").unwrap_or_else(|| UNKNOWN.to_owned()),
    )
}

pub fn list_simulators<S: SimulatorStore>(store: &S) -> Vec<DeviceRecord> {
    let dirs = match store.list_directories() {
        Ok(dirs) => dirs,
        Err(err) => {
            log::debug!("no simulator store: {err:#}");
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for dir in dirs {
        let plist = dir.join(DEVICE_PLIST);
        if !plist.is_file() {
            log::debug!("{}: no {DEVICE_PLIST}, skipping", dir.display());
            continue;
        }
        let Some(dict) = store.read_property_list(&plist) else {
            continue;
        };
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        out.push(simulator_from_plist(&dir_name, &dict));
    }

    log::info!("simulator scan: {} simulator(s)", out.len());
    out
}
