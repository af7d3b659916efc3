use thiserror::Error;

/// smsmodem unified error type
#[derive(Error, Debug)]
pub enum ModemError {
    #[error("Parameters are out of range: {0}")]
    OutOfRange(String),

    #[error("The device can not be found or can not be configured: {0}")]
    TransportUnavailable(String),

    #[error("Write to modem failed: {0}")]
    WriteFailure(#[source] std::io::Error),

    #[error("Empty message is not allowed")]
    EmptyMessage,

    #[error("No serial port found")]
    NoPortsFound,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Operation interrupted")]
    Interrupted,
}

impl From<serialport::Error> for ModemError {
    fn from(err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::InvalidInput => Self::OutOfRange(err.description),
            _ => Self::TransportUnavailable(err.description),
        }
    }
}

pub type ModemResult<T> = Result<T, ModemError>;
