use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

const FILTER_HELP: &str = "\
Which devices to list (case-insensitive):
  real      physical devices only (iOS + Android + Harmony)
  usb       same as real [default]
  all       physical devices and iOS simulators
  ios       physical iOS devices
  ios-sim   iOS simulators
  android   Android handsets
  harmony   Harmony handsets
Anything else falls back to usb.";

/// List USB-attached phones and local iOS simulators as JSON.
#[derive(Debug, Parser)]
#[command(name = "devprobe", version, about)]
pub struct Cli {
    #[arg(value_name = "FILTER", long_help = FILTER_HELP, allow_hyphen_values = true)]
    pub filter: Option<String>,

    /// Tokens after FILTER are accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,

    /// Directory holding one subdirectory per iOS simulator.
    #[arg(long, value_name = "PATH")]
    pub simulator_root: Option<PathBuf>,
}

/// Lowercase help flags so `--HELP` and `-H` still print usage.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            match arg.to_str().map(str::to_lowercase) {
                Some(lower) if lower == "--help" || lower == "-h" => OsString::from(lower),
                _ => arg,
            }
        })
        .collect()
}
