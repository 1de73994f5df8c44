//! Inventory of USB-attached phones (Android, Harmony, iOS) and local iOS
//! simulators.

pub mod classify;
pub mod cli;
pub mod config;
pub mod discover;
pub mod encode;
pub mod filter;
pub mod model;
pub mod probe;
pub mod simulator;

use crate::filter::DeviceFilter;
use crate::model::DeviceRecord;
use crate::simulator::SimulatorStore;

/// Take one snapshot and return the records `filter` selects.
///
/// USB devices come first, then simulators. Sources the filter can never
/// select from are not scanned.
pub fn inventory<U, S>(
    filter: DeviceFilter,
    scan_usb: U,
    simulators: Option<&S>,
) -> Vec<DeviceRecord>
where
    U: FnOnce() -> Vec<DeviceRecord>,
    S: SimulatorStore,
{
    let mut records = Vec::new();

    if filter.needs_usb() {
        records.extend(scan_usb());
    }
    if filter.needs_simulators() {
        if let Some(store) = simulators {
            records.extend(simulator::list_simulators(store));
        }
    }

    filter::filter(records, filter)
}
