use anyhow::Result;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::filter::DeviceFilter;
use crate::simulator::CORE_SIMULATOR_DEVICES;

pub const ENV_SIMULATOR_ROOT: &str = "DEVPROBE_SIMULATOR_ROOT";
pub const ENV_FILTER: &str = "DEVPROBE_FILTER";
pub const ENV_LOG: &str = "DEVPROBE_LOG";

/// Load `.env` into the process environment. Existing variables win.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when no home directory could be found; the simulator scan is
    /// then skipped.
    pub simulator_root: Option<PathBuf>,
    /// Filter token as configured, resolved by [`Config::default_filter`].
    pub filter_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var_os(key), dirs::home_dir()))
    }

    pub fn from_lookup<F>(lookup: F, home: Option<PathBuf>) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let simulator_root = match lookup(ENV_SIMULATOR_ROOT) {
            Some(root) => Some(PathBuf::from(root)),
            None => home.map(|home| home.join(CORE_SIMULATOR_DEVICES)),
        };
        let filter_token = lookup(ENV_FILTER).map(|token| token.to_string_lossy().into_owned());

        Self {
            simulator_root,
            filter_token,
        }
    }

    /// Call once logging is up, since an unknown token is reported as a warning.
    pub fn default_filter(&self) -> DeviceFilter {
        self.filter_token
            .as_deref()
            .map(DeviceFilter::parse_lenient)
            .unwrap_or_default()
    }
}
