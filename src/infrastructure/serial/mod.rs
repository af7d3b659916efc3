// Serial module - Serial port links and enumeration
pub mod client;
pub mod discovery;
pub mod memory;

pub use client::SerialTransport;
pub use discovery::{device_map, list_devices, DeviceDescriptor, DeviceMap, PortEntry};
pub use memory::{Journal, JournalPause, MemoryTransport, OpenFailure, WireEvent};
