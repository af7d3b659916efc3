// Modem module - AT command protocol for sending SMS and querying balance
pub mod commands;
pub mod connection;
pub mod encoding;
pub mod sequencer;

pub use commands::{balance_code, AtCommand};
pub use connection::Connection;
pub use encoding::{encode_message, EncodedMessage};
pub use sequencer::AtSequencer;
