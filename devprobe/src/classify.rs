use crate::discover::{DescriptorSource, Property, RegistryNode};
use crate::model::{DeviceKind, DeviceRecord, UNKNOWN};
use crate::probe::{probe_adb_capability, probe_ios_confirmation};

/// Vendors whose handsets are reported as Android (or Harmony).
pub const ANDROID_VENDORS: &[u16] = &[
    0x18D1, // Google
    0x04E8, // Samsung
    0x12D1, // Huawei
    0x2717, // Xiaomi
    0x2A70, // OnePlus
];

pub const HUAWEI_VENDOR: u16 = 0x12D1;
pub const APPLE_VENDOR: u16 = 0x05AC;

/// Apple product ids that only real iPhones/iPads enumerate with.
pub const IOS_PRODUCT_IDS: &[u16] = &[
    0x12A8, // usbmux
    0x12A7, // recovery
    0x12AB, // DFU
    0x12AD, // diagnostics
];

/// Identity properties of a USB device, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial: String,
    pub name: String,
    pub brand: String,
}

impl DeviceIdentity {
    /// Ids are read first; string properties (which can mean opening the
    /// device) are only fetched for devices that could become a record.
    pub fn read<N: RegistryNode>(node: &N) -> Self {
        let id = |key| {
            node.int_property(key)
                .and_then(|v| u16::try_from(v).ok())
                .unwrap_or(0)
        };
        let vendor_id = id(Property::VendorId);
        let product_id = id(Property::ProductId);

        let wanted = is_candidate(vendor_id, product_id);
        let text = |key| {
            wanted
                .then(|| node.string_property(key))
                .flatten()
                .unwrap_or_else(|| UNKNOWN.to_owned())
        };

        Self {
            vendor_id,
            product_id,
            serial: text(Property::SerialNumber),
            name: text(Property::ProductName),
            brand: text(Property::VendorName),
        }
    }
}

/// Whether the ids alone leave room for an Android, Harmony or iOS record.
pub fn is_candidate(vendor_id: u16, product_id: u16) -> bool {
    is_android_vendor(vendor_id)
        || (vendor_id == APPLE_VENDOR && IOS_PRODUCT_IDS.contains(&product_id))
}

/// Huawei ships HarmonyOS handsets under its Android vendor id; they give
/// themselves away through a HiSilicon manufacturer string or an HDC
/// (Harmony device connector) product name.
pub fn is_harmony(vendor_id: u16, brand: &str, name: &str) -> bool {
    vendor_id == HUAWEI_VENDOR
        && (brand.to_lowercase().contains("hisilicon") || name.to_lowercase().contains("hdc"))
}

pub fn is_android_vendor(vendor_id: u16) -> bool {
    ANDROID_VENDORS.contains(&vendor_id)
}

/// Apple vendor, known iOS product id, and the confirming interface present.
pub fn is_real_ios_device<N: RegistryNode>(vendor_id: u16, product_id: u16, device: &N) -> bool {
    vendor_id == APPLE_VENDOR
        && IOS_PRODUCT_IDS.contains(&product_id)
        && probe_ios_confirmation(device)
}

/// Classify one device. The Android and iOS checks are independent; the
/// vendor sets are disjoint so at most one of them fires in practice.
pub fn classify<N: RegistryNode>(id: &DeviceIdentity, device: &N) -> Vec<DeviceRecord> {
    let mut out = Vec::new();

    if is_android_vendor(id.vendor_id) {
        let kind = if is_harmony(id.vendor_id, &id.brand, &id.name) {
            DeviceKind::Harmony
        } else {
            DeviceKind::Android
        };

        out.push(DeviceRecord::android_family(
            kind,
            &id.name,
            &id.serial,
            &id.brand,
            id.vendor_id,
            id.product_id,
            probe_adb_capability(device),
        ));
    }

    if is_real_ios_device(id.vendor_id, id.product_id, device) {
        out.push(DeviceRecord::ios(
            &id.name,
            &id.serial,
            id.vendor_id,
            id.product_id,
        ));
    }

    out
}

/// Enumerate and classify every attached USB device.
///
/// Each device node is dropped at the end of its own iteration. If the source
/// cannot be enumerated the result is simply empty.
pub fn scan_usb_devices<S: DescriptorSource>(source: &S) -> Vec<DeviceRecord> {
    let devices = match source.devices() {
        Ok(devices) => devices,
        Err(err) => {
            log::warn!("USB enumeration failed: {err:#}");
            return Vec::new();
        }
    };

    let mut results = Vec::new();
    let mut seen = 0usize;

    for device in devices {
        seen += 1;
        let id = DeviceIdentity::read(&device);
        let records = classify(&id, &device);
        log::debug!(
            "{:04x}:{:04x} {:?} -> {} record(s)",
            id.vendor_id,
            id.product_id,
            id.name,
            records.len()
        );
        results.extend(records);
    }

    log::info!("USB scan: {seen} device(s), {} handset(s)", results.len());
    results
}
