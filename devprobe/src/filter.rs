use std::fmt;
use std::str::FromStr;

use crate::model::{DeviceKind, DeviceRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceFilter {
    Android,
    Ios,
    IosSim,
    Harmony,
    Real,
    #[default]
    Usb,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown device filter '{}'", self.0)
    }
}

impl std::error::Error for UnknownFilter {}

impl DeviceFilter {
    pub const ALL: [DeviceFilter; 7] = [
        DeviceFilter::Real,
        DeviceFilter::Usb,
        DeviceFilter::All,
        DeviceFilter::Ios,
        DeviceFilter::IosSim,
        DeviceFilter::Android,
        DeviceFilter::Harmony,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceFilter::Android => "android",
            DeviceFilter::Ios => "ios",
            DeviceFilter::IosSim => "ios-sim",
            DeviceFilter::Harmony => "harmony",
            DeviceFilter::Real => "real",
            DeviceFilter::Usb => "usb",
            DeviceFilter::All => "all",
        }
    }

    /// Parse a filter token, falling back to `usb` for anything unrecognised.
    pub fn parse_lenient(token: &str) -> Self {
        token.parse().unwrap_or_else(|err: UnknownFilter| {
            log::warn!("{err}, falling back to '{}'", DeviceFilter::Usb);
            DeviceFilter::Usb
        })
    }

    pub fn selects(self, kind: DeviceKind) -> bool {
        match self {
            DeviceFilter::Android => kind == DeviceKind::Android,
            DeviceFilter::Ios => kind == DeviceKind::Ios,
            DeviceFilter::IosSim => kind == DeviceKind::IosSimulator,
            DeviceFilter::Harmony => kind == DeviceKind::Harmony,
            DeviceFilter::Real | DeviceFilter::Usb => kind.is_physical(),
            DeviceFilter::All => true,
        }
    }

    /// Whether any USB-originated record can pass this filter.
    pub fn needs_usb(self) -> bool {
        self != DeviceFilter::IosSim
    }

    /// Whether any simulator record can pass this filter.
    pub fn needs_simulators(self) -> bool {
        matches!(self, DeviceFilter::IosSim | DeviceFilter::All)
    }
}

impl FromStr for DeviceFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        DeviceFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

impl fmt::Display for DeviceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep the records `filter` selects, in input order.
pub fn filter(records: Vec<DeviceRecord>, filter: DeviceFilter) -> Vec<DeviceRecord> {
    records
        .into_iter()
        .filter(|r| filter.selects(r.kind()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<DeviceRecord> {
        let sim = |name: &str, udid: &str, state: &str| {
            DeviceRecord::simulator(name.into(), udid.into(), "r".into(), state.into(), "t".into())
        };
        vec![
            DeviceRecord::android_family(
                DeviceKind::Android,
                "Pixel",
                "1",
                "Google",
                0x18D1,
                0x4EE1,
                true,
            ),
            sim("iPhone 15", "A", "Booted"),
            DeviceRecord::ios("iPhone", "2", 0x05AC, 0x12A8),
            DeviceRecord::android_family(
                DeviceKind::Harmony,
                "HDC",
                "3",
                "HUAWEI",
                0x12D1,
                0x5000,
                false,
            ),
            sim("iPad", "B", "Shutdown"),
        ]
    }

    fn kinds(recs: &[DeviceRecord]) -> Vec<DeviceKind> {
        recs.iter().map(DeviceRecord::kind).collect()
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("IOS-SIM".parse::<DeviceFilter>(), Ok(DeviceFilter::IosSim));
        assert_eq!("Harmony".parse::<DeviceFilter>(), Ok(DeviceFilter::Harmony));
        assert_eq!("usb".parse::<DeviceFilter>(), Ok(DeviceFilter::Usb));
        assert!("phones".parse::<DeviceFilter>().is_err());
    }

    #[test]
    fn unknown_token_falls_back_to_usb() {
        assert_eq!(DeviceFilter::parse_lenient("--everything"), DeviceFilter::Usb);
        assert_eq!(DeviceFilter::parse_lenient("ALL"), DeviceFilter::All);
    }

    #[test]
    fn ios_sim_selects_only_simulators() {
        let out = filter(sample(), DeviceFilter::IosSim);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.kind() == DeviceKind::IosSimulator));

        let sims_only: Vec<_> = sample()
            .into_iter()
            .filter(|r| !r.kind().is_physical())
            .collect();
        assert_eq!(filter(sims_only.clone(), DeviceFilter::IosSim), sims_only);
    }

    #[test]
    fn real_and_usb_select_physical_devices() {
        let expected = vec![DeviceKind::Android, DeviceKind::Ios, DeviceKind::Harmony];
        assert_eq!(kinds(&filter(sample(), DeviceFilter::Real)), expected);
        assert_eq!(kinds(&filter(sample(), DeviceFilter::Usb)), expected);
    }

    #[test]
    fn all_is_union_of_usb_and_ios_sim() {
        let all = filter(sample(), DeviceFilter::All);
        let usb = filter(sample(), DeviceFilter::Usb);
        let sim = filter(sample(), DeviceFilter::IosSim);
        assert_eq!(all.len(), usb.len() + sim.len());
        assert!(usb.iter().chain(sim.iter()).all(|r| all.contains(r)));
        assert_eq!(all, sample());
    }

    #[test]
    fn single_kind_filters() {
        let only = |f| kinds(&filter(sample(), f));
        assert_eq!(only(DeviceFilter::Android), vec![DeviceKind::Android]);
        assert_eq!(only(DeviceFilter::Ios), vec![DeviceKind::Ios]);
        assert_eq!(only(DeviceFilter::Harmony), vec![DeviceKind::Harmony]);
    }

    #[test]
    fn scan_needs() {
        assert!(!DeviceFilter::IosSim.needs_usb());
        assert!(DeviceFilter::IosSim.needs_simulators());
        assert!(!DeviceFilter::Usb.needs_simulators());
        assert!(DeviceFilter::All.needs_usb() && DeviceFilter::All.needs_simulators());
    }
}
