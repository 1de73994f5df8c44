use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder for any string property that could not be read.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Android,
    Harmony,
    Ios,
    IosSimulator,
}

impl DeviceKind {
    pub fn is_physical(self) -> bool {
        !matches!(self, DeviceKind::IosSimulator)
    }
}

/// 16-bit USB vendor or product id, rendered as `0x%04X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UsbId(pub u16);

impl fmt::Display for UsbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

impl Serialize for UsbId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One classified physical device or simulator.
///
/// Only `kind` is mandatory. The other fields are present or absent depending
/// on the kind, and absent fields never reach the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    #[serde(rename = "type")]
    kind: DeviceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<UsbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<UsbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usb_debugging: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted: Option<bool>,
}

impl DeviceRecord {
    fn empty(kind: DeviceKind) -> Self {
        Self {
            kind,
            name: None,
            serial: None,
            udid: None,
            brand: None,
            vendor_id: None,
            product_id: None,
            runtime: None,
            state: None,
            device_type: None,
            usb_debugging: None,
            trusted: None,
        }
    }

    /// Android or Harmony handset. Panics in debug builds if `kind` is not one of those two.
    pub fn android_family(
        kind: DeviceKind,
        name: &str,
        serial: &str,
        brand: &str,
        vendor_id: u16,
        product_id: u16,
        usb_debugging: bool,
    ) -> Self {
        debug_assert!(matches!(kind, DeviceKind::Android | DeviceKind::Harmony));
        Self {
            name: Some(name.to_owned()),
            serial: Some(serial.to_owned()),
            brand: Some(brand.to_owned()),
            vendor_id: Some(UsbId(vendor_id)),
            product_id: Some(UsbId(product_id)),
            usb_debugging: Some(usb_debugging),
            ..Self::empty(kind)
        }
    }

    /// Real iOS device. Brand is always Apple and `trusted` is always false,
    /// since no pairing check is made.
    pub fn ios(name: &str, serial: &str, vendor_id: u16, product_id: u16) -> Self {
        Self {
            name: Some(name.to_owned()),
            serial: Some(serial.to_owned()),
            brand: Some("Apple".to_owned()),
            vendor_id: Some(UsbId(vendor_id)),
            product_id: Some(UsbId(product_id)),
            trusted: Some(false),
            ..Self::empty(DeviceKind::Ios)
        }
    }

    pub fn simulator(
        name: String,
        udid: String,
        runtime: String,
        state: String,
        device_type: String,
    ) -> Self {
        Self {
            name: Some(name),
            udid: Some(udid),
            runtime: Some(runtime),
            state: Some(state),
            device_type: Some(device_type),
            ..Self::empty(DeviceKind::IosSimulator)
        }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }
}
