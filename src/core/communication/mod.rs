// Communication module - Transport and timing abstractions
pub mod transport;

pub use transport::{Pause, ThreadPause, Transport, TransportType};
