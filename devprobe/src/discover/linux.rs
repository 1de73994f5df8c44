#![cfg(target_os = "linux")]

use anyhow::Result;
use std::ffi::OsStr;
use udev::{Device, Enumerator};

use super::{DescriptorSource, Property, PropertyValue, RegistryNode};

/// Enumerates devices through udev's `usb` subsystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdevSource;

impl DescriptorSource for UdevSource {
    type Node = UdevNode;

    fn devices(&self) -> Result<Box<dyn Iterator<Item = UdevNode> + '_>> {
        let mut en = Enumerator::new()?;
        en.match_subsystem("usb")?;
        en.match_property("DEVTYPE", "usb_device")?;

        let devices: Vec<Device> = en.scan_devices()?.collect();
        Ok(Box::new(devices.into_iter().map(UdevNode::Device)))
    }
}

pub enum UdevNode {
    Device(Device),
    Interface(Device),
}

fn attr_str(dev: &Device, name: &str) -> Option<String> {
    dev.attribute_value(name)
        .map(OsStr::to_string_lossy)
        .map(|s| s.trim().to_string())
}

/// sysfs prints ids and class codes as bare hex, e.g. `18d1` or `ff`.
fn attr_hex(dev: &Device, name: &str) -> Option<PropertyValue> {
    let raw = attr_str(dev, name)?;
    i64::from_str_radix(&raw, 16).ok().map(PropertyValue::Int)
}

impl RegistryNode for UdevNode {
    fn property(&self, key: Property) -> Option<PropertyValue> {
        match (self, key) {
            (UdevNode::Device(d), Property::VendorId) => attr_hex(d, "idVendor"),
            (UdevNode::Device(d), Property::ProductId) => attr_hex(d, "idProduct"),
            (UdevNode::Device(d), Property::SerialNumber) => {
                attr_str(d, "serial").map(PropertyValue::Str)
            }
            (UdevNode::Device(d), Property::ProductName) => {
                attr_str(d, "product").map(PropertyValue::Str)
            }
            (UdevNode::Device(d), Property::VendorName) => {
                attr_str(d, "manufacturer").map(PropertyValue::Str)
            }
            (UdevNode::Interface(i), Property::InterfaceClass) => attr_hex(i, "bInterfaceClass"),
            (UdevNode::Interface(i), Property::InterfaceSubClass) => {
                attr_hex(i, "bInterfaceSubClass")
            }
            (UdevNode::Interface(i), Property::InterfaceProtocol) => {
                attr_hex(i, "bInterfaceProtocol")
            }
            _ => None,
        }
    }

    fn children(&self) -> Result<Vec<Self>> {
        let UdevNode::Device(dev) = self else {
            return Ok(Vec::new());
        };

        let mut en = Enumerator::new()?;
        en.match_parent(dev)?;
        en.match_subsystem("usb")?;
        en.match_property("DEVTYPE", "usb_interface")?;

        Ok(en.scan_devices()?.map(UdevNode::Interface).collect())
    }
}
