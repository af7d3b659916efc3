use crate::domain::{config::ModemConfig, error::ModemResult};
use std::time::Duration;

/// Transport kind, used in log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportType {
    Serial,
    Memory,
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportType::Serial => write!(f, "serial"),
            TransportType::Memory => write!(f, "memory"),
        }
    }
}

/// Byte link to a modem.
///
/// Implementations own the underlying handle; `is_open` must report the
/// handle's real state.
pub trait Transport: Send {
    /// Get the transport type
    fn transport_type(&self) -> TransportType;

    /// Apply port, baud rate and timeout, then open the link.
    ///
    /// Fails with `OutOfRange` when the settings are refused and with
    /// `TransportUnavailable` when the device is missing, busy or already open.
    fn open(&mut self, config: &ModemConfig) -> ModemResult<()>;

    /// Close the link. Closing a closed link succeeds.
    fn close(&mut self) -> ModemResult<()>;

    fn is_open(&self) -> bool;

    /// Write the whole buffer or fail with `WriteFailure`
    fn write_all(&mut self, data: &[u8]) -> ModemResult<()>;
}

/// Blocking delay between command writes
pub trait Pause: Send {
    fn pause(&mut self, duration: Duration);
}

/// Sleeps the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_transport_type_display() {
        assert_eq!(TransportType::Serial.to_string(), "serial");
        assert_eq!(TransportType::Memory.to_string(), "memory");
    }

    #[test]
    fn test_thread_pause_blocks() {
        let start = Instant::now();
        ThreadPause.pause(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
