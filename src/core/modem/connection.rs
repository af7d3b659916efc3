use crate::core::communication::{Pause, ThreadPause, Transport};
use crate::core::modem::commands::{balance_code, balance_script, send_message_script};
use crate::core::modem::encoding::encode_message;
use crate::core::modem::sequencer::AtSequencer;
use crate::domain::config::{ModemConfig, PacingConfig, Validation, DEFAULT_CARRIER};
use crate::domain::error::ModemError;
use crate::infrastructure::logging::LogContext;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

/// A GSM modem reached through one exclusively owned transport.
///
/// Every operation is infallible from the caller's point of view: failures
/// are written to the log context and the operation is abandoned.
pub struct Connection<T: Transport, P: Pause = ThreadPause> {
    config: ModemConfig,
    transport: T,
    sequencer: AtSequencer<P>,
    carrier: String,
    rng: StdRng,
    log: LogContext,
}

impl<T: Transport> Connection<T> {
    pub fn new(config: ModemConfig, transport: T, log: LogContext) -> Self {
        Self::with_pause(config, transport, ThreadPause, log)
    }
}

impl<T: Transport, P: Pause> Connection<T, P> {
    /// Connection whose delays go through `pause`
    pub fn with_pause(config: ModemConfig, transport: T, pause: P, log: LogContext) -> Self {
        Self {
            config,
            transport,
            sequencer: AtSequencer::new(pause, PacingConfig::default()),
            carrier: DEFAULT_CARRIER.to_string(),
            rng: StdRng::from_entropy(),
            log,
        }
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.sequencer.set_pacing(pacing);
        self
    }

    /// Carrier whose USSD code `get_balance` dials
    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = carrier.into();
        self
    }

    /// Deterministic pacing jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn set_port(&mut self, port: impl Into<String>) {
        self.config.set_port(port);
    }

    /// Takes effect on the next `connect`
    pub fn set_baud_rate(&mut self, baud_rate: i64) -> Validation<u32> {
        let config = &mut self.config;
        self.log.in_scope(|| config.set_baud_rate(baud_rate))
    }

    /// Takes effect on the next `connect`
    pub fn set_timeout(&mut self, timeout_secs: i64) -> Validation<u64> {
        let config = &mut self.config;
        self.log.in_scope(|| config.set_timeout(timeout_secs))
    }

    /// Whether the transport is open right now
    pub fn connected(&self) -> bool {
        self.transport.is_open()
    }

    /// Open the transport with the current settings
    pub fn connect(&mut self) {
        let (transport, config) = (&mut self.transport, &self.config);
        self.log.in_scope(|| match transport.open(config) {
            Ok(()) => info!(
                "Connected to {} over {}",
                config.port(),
                transport.transport_type()
            ),
            Err(err) => log_link_failure(&err),
        })
    }

    /// Close the transport; closing a closed connection does nothing
    pub fn disconnect(&mut self) {
        let (transport, config) = (&mut self.transport, &self.config);
        self.log.in_scope(|| {
            let was_open = transport.is_open();
            match transport.close() {
                Ok(()) if was_open => info!("Disconnected from {}", config.port()),
                Ok(()) => debug!("Disconnect requested while not connected"),
                Err(err) => log_link_failure(&err),
            }
        })
    }

    /// Send `text` to `number` as a UCS2 text-mode SMS.
    ///
    /// `number` goes into `AT+CMGS` unescaped and must be well formed.
    pub fn send_message(&mut self, number: &str, text: &str) {
        let Self {
            transport,
            sequencer,
            rng,
            log,
            ..
        } = self;

        log.in_scope(|| {
            if !transport.is_open() {
                warn!("Cannot send message if device is not connected");
                return;
            }

            sequencer.pace(rng);

            let body = match encode_message(text) {
                Ok(body) => body,
                Err(err) => {
                    warn!("{}", err);
                    return;
                }
            };

            let script = send_message_script(number, body);
            match sequencer.run(transport, &script) {
                Ok(()) => info!("Message submitted to {}", number),
                Err(err) => error!("Attempt to SEND message was unsuccessful: {}", err),
            }
        })
    }

    /// Dial the carrier's balance inquiry code. The reply is not read.
    ///
    /// Does nothing, silently, when not connected.
    pub fn get_balance(&mut self) {
        let Self {
            transport,
            sequencer,
            carrier,
            log,
            ..
        } = self;

        log.in_scope(|| {
            if !transport.is_open() {
                return;
            }

            let Some(code) = balance_code(carrier.as_str()) else {
                warn!("No balance inquiry code known for carrier '{}'", carrier);
                return;
            };

            match sequencer.run(transport, &balance_script(code)) {
                Ok(()) => info!("Balance inquiry {} dialed", code),
                Err(err) => error!("Attempt to query balance was unsuccessful: {}", err),
            }
        })
    }
}

fn log_link_failure(err: &ModemError) {
    match err {
        ModemError::OutOfRange(_) | ModemError::TransportUnavailable(_) => error!("{}", err),
        other => error!("The device can not be found or can not be configured: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::CaptureWriter;
    use crate::infrastructure::serial::{JournalPause, MemoryTransport, OpenFailure};
    use std::time::Duration;

    fn connection(
        transport: MemoryTransport,
    ) -> (Connection<MemoryTransport, JournalPause>, CaptureWriter) {
        let capture = CaptureWriter::new();
        let pause = transport.pause();
        let conn = Connection::with_pause(
            ModemConfig::default(),
            transport,
            pause,
            LogContext::with_writer(capture.clone()),
        )
        .with_seed(42);
        (conn, capture)
    }

    #[test]
    fn test_connect_and_disconnect() {
        let (mut conn, capture) = connection(MemoryTransport::new());
        assert!(!conn.connected());

        conn.connect();
        assert!(conn.connected());
        assert_eq!(conn.transport().last_config(), Some(&ModemConfig::default()));

        conn.disconnect();
        assert!(!conn.connected());
        conn.disconnect();
        assert!(!conn.connected());

        conn.connect();
        assert!(conn.connected());
        assert!(capture.contents().contains("Connected to /dev/ttyUSB0"));
    }

    #[test]
    fn test_connect_out_of_range() {
        let transport =
            MemoryTransport::new().failing_open(OpenFailure::OutOfRange("bad stop bits".into()));
        let (mut conn, capture) = connection(transport);

        conn.connect();

        assert!(!conn.connected());
        let contents = capture.contents();
        assert!(contents.contains("Parameters are out of range"));
        assert!(contents.contains("bad stop bits"));
    }

    #[test]
    fn test_connect_unavailable() {
        let transport =
            MemoryTransport::new().failing_open(OpenFailure::Unavailable("no such device".into()));
        let (mut conn, capture) = connection(transport);

        conn.connect();

        assert!(!conn.connected());
        assert!(capture
            .contents()
            .contains("The device can not be found or can not be configured"));
    }

    #[test]
    fn test_setters_keep_previous_value() {
        let (mut conn, capture) = connection(MemoryTransport::new());

        assert!(conn.set_baud_rate(9600).is_valid());
        assert!(!conn.set_baud_rate(9601).is_valid());
        assert_eq!(conn.config().baud_rate(), 9600);

        assert!(!conn.set_timeout(0).is_valid());
        assert_eq!(conn.config().timeout_secs(), 1);

        conn.set_port("/dev/ttyUSB3");
        assert_eq!(conn.config().port(), "/dev/ttyUSB3");

        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("inappropriate baudrate"));
        assert!(lines[1].contains("inappropriate timeout"));
    }

    #[test]
    fn test_send_requires_connection() {
        let (mut conn, capture) = connection(MemoryTransport::new());
        let journal = conn.transport().journal();

        conn.send_message("+79627746292", "Hi");

        assert!(journal.events().is_empty());
        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Cannot send message if device is not connected"));
    }

    #[test]
    fn test_send_empty_message_writes_nothing() {
        let (mut conn, capture) = connection(MemoryTransport::new());
        conn.connect();
        let journal = conn.transport().journal();

        conn.send_message("+79627746292", "   ");

        assert!(journal.writes().is_empty());
        assert_eq!(journal.pauses().len(), 1);
        assert!(capture.contents().contains("Empty message is not allowed"));
    }

    #[test]
    fn test_send_message_sequence() {
        let (mut conn, _capture) = connection(MemoryTransport::new());
        conn.connect();
        let journal = conn.transport().journal();

        conn.send_message("+79627746292", "Hi");

        assert_eq!(
            journal.writes(),
            vec![
                b"ATZ\r\n".to_vec(),
                b"AT+CMGF=1\r\n".to_vec(),
                b"AT+CSMP=17,167,0,8\r\n".to_vec(),
                b"AT+CMGS='+79627746292'\r\n".to_vec(),
                b"00480069".to_vec(),
                vec![0x1A],
            ]
        );

        let pauses = journal.pauses();
        assert_eq!(pauses.len(), 6);
        assert!(pauses[0] >= Duration::from_secs(1) && pauses[0] <= Duration::from_secs(5));
        assert!(pauses[1..].iter().all(|p| *p == Duration::from_secs(1)));
    }

    #[test]
    fn test_send_aborts_on_write_failure() {
        let (mut conn, capture) = connection(MemoryTransport::new().failing_write_at(3));
        conn.connect();
        let journal = conn.transport().journal();

        conn.send_message("+79627746292", "Hi");

        assert_eq!(journal.writes().len(), 3);
        assert!(capture
            .contents()
            .contains("Attempt to SEND message was unsuccessful"));
    }

    #[test]
    fn test_balance_sequence() {
        let (mut conn, _capture) = connection(MemoryTransport::new());
        conn.connect();
        let journal = conn.transport().journal();

        conn.get_balance();

        assert_eq!(
            journal.writes(),
            vec![
                b"ATZ\r\n".to_vec(),
                b"AT+CMGF=1\r\n".to_vec(),
                b"AT+CUSD=1,'*102#',15\r\n".to_vec(),
            ]
        );
        assert_eq!(journal.pauses(), vec![Duration::from_secs(1); 2]);
    }

    #[test]
    fn test_balance_when_closed_is_silent() {
        let (mut conn, capture) = connection(MemoryTransport::new());
        let journal = conn.transport().journal();

        conn.get_balance();

        assert!(journal.events().is_empty());
        assert!(capture.contents().is_empty());
    }

    #[test]
    fn test_balance_unknown_carrier() {
        let (conn, capture) = connection(MemoryTransport::new());
        let mut conn = conn.with_carrier("nowhere");
        conn.connect();
        let journal = conn.transport().journal();

        conn.get_balance();

        assert!(journal.writes().is_empty());
        assert!(capture.contents().contains("nowhere"));
    }
}
