use crate::core::communication::{Pause, Transport, TransportType};
use crate::domain::{
    config::ModemConfig,
    error::{ModemError, ModemResult},
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Something that happened on a recorded link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireEvent {
    Write(Vec<u8>),
    Pause(Duration),
}

/// Shared, ordered record of writes and pauses
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<WireEvent>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WireEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: WireEvent) {
        self.lock().push(event);
    }

    pub fn events(&self) -> Vec<WireEvent> {
        self.lock().clone()
    }

    /// Only the written buffers, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                WireEvent::Write(data) => Some(data.clone()),
                WireEvent::Pause(_) => None,
            })
            .collect()
    }

    /// Only the pauses, in order
    pub fn pauses(&self) -> Vec<Duration> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                WireEvent::Pause(duration) => Some(*duration),
                WireEvent::Write(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Failure injected into a [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenFailure {
    OutOfRange(String),
    Unavailable(String),
}

/// In-memory modem link that records every write
#[derive(Debug, Default)]
pub struct MemoryTransport {
    journal: Journal,
    open: bool,
    open_failure: Option<OpenFailure>,
    fail_write_at: Option<usize>,
    writes: usize,
    last_config: Option<ModemConfig>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record into an existing journal
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Make every `open` fail
    pub fn failing_open(mut self, failure: OpenFailure) -> Self {
        self.open_failure = Some(failure);
        self
    }

    /// Make the write with this zero-based index fail
    pub fn failing_write_at(mut self, index: usize) -> Self {
        self.fail_write_at = Some(index);
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// A pause recorder sharing this transport's journal
    pub fn pause(&self) -> JournalPause {
        JournalPause {
            journal: self.journal.clone(),
        }
    }

    /// Settings applied by the last successful `open`
    pub fn last_config(&self) -> Option<&ModemConfig> {
        self.last_config.as_ref()
    }
}

impl Transport for MemoryTransport {
    fn transport_type(&self) -> TransportType {
        TransportType::Memory
    }

    fn open(&mut self, config: &ModemConfig) -> ModemResult<()> {
        match &self.open_failure {
            Some(OpenFailure::OutOfRange(reason)) => {
                return Err(ModemError::OutOfRange(reason.clone()))
            }
            Some(OpenFailure::Unavailable(reason)) => {
                return Err(ModemError::TransportUnavailable(reason.clone()))
            }
            None => {}
        }
        if self.open {
            return Err(ModemError::TransportUnavailable(format!(
                "port {} is already open",
                config.port()
            )));
        }
        self.open = true;
        self.last_config = Some(config.clone());
        Ok(())
    }

    fn close(&mut self) -> ModemResult<()> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn write_all(&mut self, data: &[u8]) -> ModemResult<()> {
        let index = self.writes;
        self.writes += 1;
        if !self.open || self.fail_write_at == Some(index) {
            return Err(ModemError::WriteFailure(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                format!("write #{} refused", index),
            )));
        }
        self.journal.push(WireEvent::Write(data.to_vec()));
        Ok(())
    }
}

/// Records pauses into a [`Journal`] instead of sleeping
#[derive(Debug, Clone, Default)]
pub struct JournalPause {
    journal: Journal,
}

impl Pause for JournalPause {
    fn pause(&mut self, duration: Duration) {
        self.journal.push(WireEvent::Pause(duration));
    }
}
