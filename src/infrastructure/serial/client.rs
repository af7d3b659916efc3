use crate::core::communication::{Transport, TransportType};
use crate::domain::{
    config::ModemConfig,
    error::{ModemError, ModemResult},
};
use serialport::SerialPort;
use std::io::Write;
use tracing::{debug, info};

/// Serial port link to the modem
#[derive(Default)]
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for SerialTransport {
    fn transport_type(&self) -> TransportType {
        TransportType::Serial
    }

    fn open(&mut self, config: &ModemConfig) -> ModemResult<()> {
        if self.port.is_some() {
            return Err(ModemError::TransportUnavailable(format!(
                "port {} is already open",
                config.port()
            )));
        }

        // 8N1 without flow control is what GSM modems expect in AT mode
        let port = serialport::new(config.port(), config.baud_rate())
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.timeout())
            .open()?;

        info!(
            "Serial port {} opened at {} baud",
            config.port(),
            config.baud_rate()
        );
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> ModemResult<()> {
        if let Some(mut port) = self.port.take() {
            port.flush().map_err(ModemError::WriteFailure)?;
            info!("Serial port {} closed", port.name().unwrap_or_default());
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write_all(&mut self, data: &[u8]) -> ModemResult<()> {
        let port = self.port.as_mut().ok_or_else(|| {
            ModemError::WriteFailure(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "serial port is not open",
            ))
        })?;
        port.write_all(data).map_err(ModemError::WriteFailure)?;
        debug!("Sent {} bytes over serial", data.len());
        Ok(())
    }
}
