use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::DeviceRecord;

/// Key order of every rendered object. Keys absent from a record are skipped.
pub const FIELD_ORDER: [&str; 12] = [
    "type",
    "name",
    "serial",
    "udid",
    "brand",
    "vendor_id",
    "product_id",
    "runtime",
    "state",
    "device_type",
    "usb_debugging",
    "trusted",
];

/// Render records as a JSON array with a fixed key order per object.
pub fn encode(records: &[DeviceRecord]) -> Result<String> {
    if records.is_empty() {
        return Ok("[]".to_string());
    }

    let mut objects = Vec::with_capacity(records.len());
    for record in records {
        objects.push(encode_object(record)?);
    }

    Ok(format!("[\n{}\n]", objects.join(",\n")))
}

fn encode_object(record: &DeviceRecord) -> Result<String> {
    let value = serde_json::to_value(record).context("failed to serialize device record")?;
    let Value::Object(map) = value else {
        anyhow::bail!("device record did not serialize to an object");
    };

    let mut fields = Vec::with_capacity(FIELD_ORDER.len());
    for key in FIELD_ORDER {
        if let Some(v) = map.get(key) {
            fields.push(format!("    \"{key}\" : {}", serde_json::to_string(v)?));
        }
    }

    Ok(format!("  {{\n{}\n  }}", fields.join(",\n")))
}
