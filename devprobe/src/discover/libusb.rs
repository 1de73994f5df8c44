use anyhow::{Context as _, Result};
use rusb::{Context, Device, DeviceDescriptor, UsbContext};
use std::cell::OnceCell;

use super::{DescriptorSource, Property, PropertyValue, RegistryNode};

/// Enumerates devices through libusb.
pub struct LibusbSource {
    ctx: Context,
}

impl LibusbSource {
    pub fn new() -> Result<Self> {
        let ctx = Context::new().context("failed to initialise libusb")?;
        Ok(Self { ctx })
    }
}

impl DescriptorSource for LibusbSource {
    type Node = LibusbNode;

    fn devices(&self) -> Result<Box<dyn Iterator<Item = LibusbNode> + '_>> {
        // Each Device holds its own reference, so the list can go right away.
        let list = self.ctx.devices().context("failed to list USB devices")?;
        let devices: Vec<Device<Context>> = list.iter().collect();
        drop(list);

        Ok(Box::new(devices.into_iter().filter_map(|dev| {
            match dev.device_descriptor() {
                Ok(descriptor) => Some(LibusbNode::Device(DeviceNode {
                    device: dev,
                    descriptor,
                    strings: OnceCell::new(),
                })),
                Err(err) => {
                    log::debug!(
                        "bus {:03} device {:03}: no descriptor: {err}",
                        dev.bus_number(),
                        dev.address()
                    );
                    None
                }
            }
        })))
    }
}

pub enum LibusbNode {
    Device(DeviceNode),
    Interface { class: u8, subclass: u8, protocol: u8 },
}

pub struct DeviceNode {
    device: Device<Context>,
    descriptor: DeviceDescriptor,
    strings: OnceCell<UsbStrings>,
}

#[derive(Debug, Default)]
struct UsbStrings {
    serial: Option<String>,
    product: Option<String>,
    manufacturer: Option<String>,
}

impl DeviceNode {
    /// String descriptors need an open handle; it is closed before returning.
    fn strings(&self) -> &UsbStrings {
        self.strings.get_or_init(|| {
            let handle = match self.device.open() {
                Ok(h) => h,
                Err(err) => {
                    log::debug!(
                        "{:04x}:{:04x}: cannot open for string descriptors: {err}",
                        self.descriptor.vendor_id(),
                        self.descriptor.product_id()
                    );
                    return UsbStrings::default();
                }
            };

            let read = |index: Option<u8>| {
                index.and_then(|i| handle.read_string_descriptor_ascii(i).ok())
            };

            UsbStrings {
                serial: read(self.descriptor.serial_number_string_index()),
                product: read(self.descriptor.product_string_index()),
                manufacturer: read(self.descriptor.manufacturer_string_index()),
            }
        })
    }
}

impl RegistryNode for LibusbNode {
    fn property(&self, key: Property) -> Option<PropertyValue> {
        match self {
            LibusbNode::Device(dev) => match key {
                Property::VendorId => Some(PropertyValue::Int(dev.descriptor.vendor_id().into())),
                Property::ProductId => {
                    Some(PropertyValue::Int(dev.descriptor.product_id().into()))
                }
                Property::SerialNumber => dev.strings().serial.clone().map(PropertyValue::Str),
                Property::ProductName => dev.strings().product.clone().map(PropertyValue::Str),
                Property::VendorName => {
                    dev.strings().manufacturer.clone().map(PropertyValue::Str)
                }
                _ => None,
            },
            LibusbNode::Interface {
                class,
                subclass,
                protocol,
            } => match key {
                Property::InterfaceClass => Some(PropertyValue::Int((*class).into())),
                Property::InterfaceSubClass => Some(PropertyValue::Int((*subclass).into())),
                Property::InterfaceProtocol => Some(PropertyValue::Int((*protocol).into())),
                _ => None,
            },
        }
    }

    fn children(&self) -> Result<Vec<Self>> {
        let LibusbNode::Device(dev) = self else {
            return Ok(Vec::new());
        };

        let cfg = dev
            .device
            .active_config_descriptor()
            .context("no active configuration")?;

        let mut out = Vec::new();
        for iface in cfg.interfaces() {
            for setting in iface.descriptors() {
                out.push(LibusbNode::Interface {
                    class: setting.class_code(),
                    subclass: setting.sub_class_code(),
                    protocol: setting.protocol_code(),
                });
            }
        }
        Ok(out)
    }
}
