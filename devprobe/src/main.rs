use anyhow::Result;
use clap::Parser;
use std::io::Write;

use devprobe::cli::{self, Cli};
use devprobe::config::{self, Config, ENV_LOG};
use devprobe::discover;
use devprobe::encode::encode;
use devprobe::filter::DeviceFilter;
use devprobe::simulator::CoreSimulatorStore;

fn main() -> Result<()> {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));

    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(ENV_LOG, "warn")).init();
    let config = Config::from_env()?;

    if !cli.rest.is_empty() {
        log::debug!("ignoring extra arguments: {:?}", cli.rest);
    }

    let filter = match cli.filter.as_deref() {
        Some(token) => DeviceFilter::parse_lenient(token),
        None => config.default_filter(),
    };

    let store = cli
        .simulator_root
        .or(config.simulator_root)
        .map(CoreSimulatorStore::new);
    match &store {
        Some(store) => log::debug!("simulator root: {}", store.root().display()),
        None => log::warn!("no home directory, skipping simulator scan"),
    }

    log::debug!("filter: {filter}");
    let records = devprobe::inventory(filter, discover::scan_default, store.as_ref());

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", encode(&records)?)?;
    Ok(())
}
