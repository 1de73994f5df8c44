use crate::model::DeviceRecord;

#[cfg(feature = "libusb")]
pub mod libusb;
#[cfg(all(target_os = "linux", feature = "linux-udev"))]
pub mod linux;

/// Named properties a registry node may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    VendorId,
    ProductId,
    SerialNumber,
    ProductName,
    VendorName,
    InterfaceClass,
    InterfaceSubClass,
    InterfaceProtocol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Int(i64),
    Str(String),
}

/// A device or interface entry in the host's USB registry.
///
/// A node owns its registry reference and releases it on drop, so a node must
/// not be kept past the step that looked at it.
pub trait RegistryNode: Sized {
    fn property(&self, key: Property) -> Option<PropertyValue>;

    /// Direct children of this node. An error means the subtree could not be
    /// opened at all.
    fn children(&self) -> anyhow::Result<Vec<Self>>;

    fn int_property(&self, key: Property) -> Option<i64> {
        match self.property(key)? {
            PropertyValue::Int(v) => Some(v),
            PropertyValue::Str(_) => None,
        }
    }

    fn string_property(&self, key: Property) -> Option<String> {
        match self.property(key)? {
            PropertyValue::Str(s) => Some(s),
            PropertyValue::Int(_) => None,
        }
    }
}

/// Yields the USB devices currently attached to the host.
pub trait DescriptorSource {
    type Node: RegistryNode;

    fn devices(&self) -> anyhow::Result<Box<dyn Iterator<Item = Self::Node> + '_>>;
}

/// Source used when no USB backend is compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSource;

#[derive(Debug)]
pub enum NullNode {}

impl RegistryNode for NullNode {
    fn property(&self, _key: Property) -> Option<PropertyValue> {
        match *self {}
    }

    fn children(&self) -> anyhow::Result<Vec<Self>> {
        match *self {}
    }
}

impl DescriptorSource for NullSource {
    type Node = NullNode;

    fn devices(&self) -> anyhow::Result<Box<dyn Iterator<Item = NullNode> + '_>> {
        Ok(Box::new(std::iter::empty()))
    }
}

/// Scan USB with whichever backend this build carries.
pub fn scan_default() -> Vec<DeviceRecord> {
    #[cfg(all(target_os = "linux", feature = "linux-udev"))]
    {
        crate::classify::scan_usb_devices(&linux::UdevSource)
    }

    #[cfg(all(
        feature = "libusb",
        not(all(target_os = "linux", feature = "linux-udev"))
    ))]
    {
        match libusb::LibusbSource::new() {
            Ok(source) => crate::classify::scan_usb_devices(&source),
            Err(err) => {
                log::warn!("libusb unavailable, skipping USB scan: {err:#}");
                Vec::new()
            }
        }
    }

    #[cfg(not(any(feature = "libusb", all(target_os = "linux", feature = "linux-udev"))))]
    {
        crate::classify::scan_usb_devices(&NullSource)
    }
}
