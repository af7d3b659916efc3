use smsmodem::domain::config::{validate_baud_rate, validate_timeout, Rejection};
use smsmodem::infrastructure::logging::CaptureWriter;
use smsmodem::infrastructure::serial::{device_map, MemoryTransport, OpenFailure};
use smsmodem::{encode_message, Connection, LogContext, ModemConfig, ModemError, ModemResult};
use std::error::Error;

/// Error handling and resilience tests
#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let errors = vec![
            ModemError::OutOfRange("baud".to_string()),
            ModemError::TransportUnavailable("gone".to_string()),
            ModemError::WriteFailure(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "eof")),
            ModemError::EmptyMessage,
            ModemError::NoPortsFound,
            ModemError::Config { message: "Config error".to_string() },
            ModemError::Output("Output error".to_string()),
            ModemError::Interrupted,
        ];

        for error in errors {
            assert!(!error.to_string().is_empty(), "Error display should not be empty");
        }

        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModemError>();
    }

    #[test]
    fn test_write_failure_keeps_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "cable unplugged");
        let error = ModemError::WriteFailure(cause);

        let source = error.source().expect("write failure should carry its cause");
        assert_eq!(source.to_string(), "cable unplugged");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: ModemError = io_error.into();
        assert!(matches!(error, ModemError::Io(_)));
    }

    #[test]
    fn test_result_type() {
        fn empty() -> ModemResult<String> {
            Ok(encode_message(" ")?.into_string())
        }

        assert!(matches!(empty(), Err(ModemError::EmptyMessage)));
    }

    #[test]
    fn test_validation_outcomes() {
        assert!(validate_baud_rate(9600).is_valid());
        assert!(!validate_baud_rate(0).is_valid());
        assert!(!validate_timeout(0).is_valid());
        assert!(validate_timeout(60).is_valid());
        assert!(matches!(
            validate_timeout(61),
            smsmodem::Validation::Invalid(Rejection::Timeout(61))
        ));
    }

    #[test]
    fn test_failures_never_escape_connection() {
        let capture = CaptureWriter::new();
        let transport = MemoryTransport::new()
            .failing_open(OpenFailure::Unavailable("Permission denied".to_string()));
        let mut modem = Connection::new(
            ModemConfig::default(),
            transport,
            LogContext::with_writer(capture.clone()),
        );

        modem.connect();
        modem.send_message("+79627746292", "Hi");
        modem.get_balance();
        modem.disconnect();

        assert!(!modem.connected());
        let contents = capture.contents();
        assert!(contents.contains("Permission denied"));
        assert!(contents.contains("Cannot send message if device is not connected"));
    }

    #[test]
    fn test_no_ports() {
        let capture = CaptureWriter::new();
        let log = LogContext::with_writer(capture.clone());

        let result = log.in_scope(|| device_map(Vec::new()));

        assert!(matches!(result, Err(ModemError::NoPortsFound)));
        assert!(capture.contents().contains("No serial port found"));
    }
}
