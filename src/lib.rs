//! smsmodem Library
//!
//! Drives a GSM modem over a serial link with plaintext AT commands:
//! sends UCS2 text-mode SMS and dials the carrier's USSD balance inquiry.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::communication::{Pause, ThreadPause, Transport};
pub use crate::core::modem::{encode_message, Connection, EncodedMessage};
pub use crate::domain::config::{AppConfig, ModemConfig, Validation};
pub use crate::domain::error::{ModemError, ModemResult};
pub use crate::infrastructure::logging::LogContext;
pub use crate::infrastructure::serial::{list_devices, DeviceMap, SerialTransport};
