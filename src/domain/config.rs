use crate::domain::error::ModemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Port used when none is configured
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
/// Baud rate used when the supplied one is rejected
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
/// Timeout in seconds used when the supplied one is rejected
pub const DEFAULT_TIMEOUT_SECS: u64 = 1;
/// Upper bound of the read/write timeout in seconds
pub const MAX_TIMEOUT_SECS: u64 = 60;
/// Carrier whose balance inquiry code is used by default
pub const DEFAULT_CARRIER: &str = "megafon";

/// Standard serial baud rates accepted by the transport
pub const BAUD_RATES: [u32; 30] = [
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200, 230400, 460800, 500000, 576000, 921600, 1000000, 1152000, 1500000, 2000000,
    2500000, 3000000, 3500000, 4000000,
];

/// Why a configuration value was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BaudRate(i64),
    Timeout(i64),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::BaudRate(value) => write!(f, "An inappropriate baudrate value: {}", value),
            Rejection::Timeout(value) => write!(
                f,
                "An inappropriate timeout value: {} (expected 1..={} seconds)",
                value, MAX_TIMEOUT_SECS
            ),
        }
    }
}

impl From<Rejection> for ModemError {
    fn from(rejection: Rejection) -> Self {
        ModemError::OutOfRange(rejection.to_string())
    }
}

/// Outcome of validating a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation<T> {
    Valid(T),
    Invalid(Rejection),
}

impl<T> Validation<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// The accepted value, or `fallback` if it was rejected
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Validation::Valid(value) => value,
            Validation::Invalid(_) => fallback,
        }
    }
}

/// Accepts any integer so that negative or oversized input is rejected here
/// rather than failing to parse
pub fn validate_baud_rate(baud_rate: i64) -> Validation<u32> {
    match u32::try_from(baud_rate) {
        Ok(value) if BAUD_RATES.contains(&value) => Validation::Valid(value),
        _ => Validation::Invalid(Rejection::BaudRate(baud_rate)),
    }
}

pub fn validate_timeout(timeout_secs: i64) -> Validation<u64> {
    match u64::try_from(timeout_secs) {
        Ok(value) if (1..=MAX_TIMEOUT_SECS).contains(&value) => Validation::Valid(value),
        _ => Validation::Invalid(Rejection::Timeout(timeout_secs)),
    }
}

fn log_rejection<T>(outcome: &Validation<T>) {
    if let Validation::Invalid(rejection) = outcome {
        warn!("{}", rejection);
    }
}

/// Validated modem link settings.
///
/// Always holds a valid baud rate and timeout: rejected values are replaced
/// by the defaults on construction and ignored by the setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModemConfig {
    port: String,
    baud_rate: u32,
    timeout_secs: u64,
}

impl ModemConfig {
    pub fn new(port: impl Into<String>, baud_rate: i64, timeout_secs: i64) -> Self {
        let baud = validate_baud_rate(baud_rate);
        log_rejection(&baud);
        let timeout = validate_timeout(timeout_secs);
        log_rejection(&timeout);

        Self {
            port: port.into(),
            baud_rate: baud.unwrap_or(DEFAULT_BAUD_RATE),
            timeout_secs: timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn set_port(&mut self, port: impl Into<String>) {
        self.port = port.into();
    }

    /// Replace the baud rate if it is a standard rate; otherwise keep the current one
    pub fn set_baud_rate(&mut self, baud_rate: i64) -> Validation<u32> {
        let outcome = validate_baud_rate(baud_rate);
        log_rejection(&outcome);
        if let Validation::Valid(value) = outcome {
            self.baud_rate = value;
        }
        outcome
    }

    /// Replace the timeout if it lies in 1..=60 seconds; otherwise keep the current one
    pub fn set_timeout(&mut self, timeout_secs: i64) -> Validation<u64> {
        let outcome = validate_timeout(timeout_secs);
        log_rejection(&outcome);
        if let Validation::Valid(value) = outcome {
            self.timeout_secs = value;
        }
        outcome
    }
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// smsmodem configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Modem link settings
    #[serde(default)]
    pub modem: ModemSettings,
    /// AT sequence timing
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Log destinations
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Raw modem settings as written in the configuration file.
///
/// Numbers stay signed until validated so out-of-range values fall back to
/// the defaults instead of failing to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModemSettings {
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: i64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: i64,
    /// Carrier name used to pick the balance USSD code
    #[serde(default = "default_carrier")]
    pub carrier: String,
}

/// Delays inserted around AT command writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause between two consecutive command writes
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Lower bound of the random pause before a message sequence
    #[serde(default = "default_jitter_min_ms")]
    pub jitter_min_ms: u64,
    /// Upper bound of the random pause before a message sequence
    #[serde(default = "default_jitter_max_ms")]
    pub jitter_max_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file; `<cwd>/smsmodem.log` when absent
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Mirror log events to stdout
    #[serde(default = "default_console")]
    pub console: bool,
}

// Default value functions
fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_baud_rate() -> i64 {
    i64::from(DEFAULT_BAUD_RATE)
}

fn default_timeout_secs() -> i64 {
    DEFAULT_TIMEOUT_SECS as i64
}

fn default_carrier() -> String {
    DEFAULT_CARRIER.to_string()
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_jitter_min_ms() -> u64 {
    1000
}

fn default_jitter_max_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_console() -> bool {
    true
}

impl Default for ModemSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            timeout_secs: default_timeout_secs(),
            carrier: default_carrier(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            jitter_min_ms: default_jitter_min_ms(),
            jitter_max_ms: default_jitter_max_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            console: default_console(),
        }
    }
}

impl ModemSettings {
    /// Validate the raw settings, logging and replacing rejected values
    pub fn to_modem_config(&self) -> ModemConfig {
        ModemConfig::new(self.port.clone(), self.baud_rate, self.timeout_secs)
    }
}

impl PacingConfig {
    /// No delays at all
    pub fn immediate() -> Self {
        Self {
            settle_ms: 0,
            jitter_min_ms: 0,
            jitter_max_ms: 0,
        }
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
