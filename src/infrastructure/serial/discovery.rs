//! Serial port enumeration
//!
//! Turns the host's serial-port listing into a [`DeviceMap`] keyed by port name.

use crate::domain::error::{ModemError, ModemResult};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};
use std::collections::BTreeMap;
use tracing::warn;

/// Model name and hardware id of an attached port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub model: String,
    pub hwid: String,
}

/// Port name to descriptor, iterated in port order
pub type DeviceMap = BTreeMap<String, DeviceDescriptor>;

/// One enumerated port; ordering is (port, model, hwid)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PortEntry {
    pub port: String,
    pub model: String,
    pub hwid: String,
}

impl PortEntry {
    pub fn new(port: impl Into<String>, model: impl Into<String>, hwid: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            model: model.into(),
            hwid: hwid.into(),
        }
    }
}

impl From<SerialPortInfo> for PortEntry {
    fn from(info: SerialPortInfo) -> Self {
        let (model, hwid) = match info.port_type {
            SerialPortType::UsbPort(usb) => {
                let model = usb
                    .product
                    .or(usb.manufacturer)
                    .unwrap_or_else(|| "n/a".to_string());
                let mut hwid = format!("USB VID:PID={:04X}:{:04X}", usb.vid, usb.pid);
                if let Some(serial) = usb.serial_number {
                    hwid.push_str(&format!(" SER={}", serial));
                }
                (model, hwid)
            }
            SerialPortType::PciPort => ("n/a".to_string(), "PCI".to_string()),
            SerialPortType::BluetoothPort => ("n/a".to_string(), "BLUETOOTH".to_string()),
            SerialPortType::Unknown => ("n/a".to_string(), "n/a".to_string()),
        };

        Self {
            port: info.port_name,
            model,
            hwid,
        }
    }
}

/// Build the map from enumerated entries, in any order
pub fn device_map(mut entries: Vec<PortEntry>) -> ModemResult<DeviceMap> {
    if entries.is_empty() {
        warn!("No serial port found");
        return Err(ModemError::NoPortsFound);
    }

    entries.sort();
    let mut devices = DeviceMap::new();
    for entry in entries {
        devices.insert(
            entry.port,
            DeviceDescriptor {
                model: entry.model,
                hwid: entry.hwid,
            },
        );
    }
    Ok(devices)
}

/// Enumerate the serial ports currently attached to the host
pub fn list_devices() -> ModemResult<DeviceMap> {
    let ports = serialport::available_ports().map_err(|e| {
        ModemError::TransportUnavailable(format!("Failed to list serial ports: {}", e))
    })?;
    device_map(ports.into_iter().map(PortEntry::from).collect())
}
