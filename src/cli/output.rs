use crate::cli::args::OutputFormat;
use crate::domain::config::AppConfig;
use crate::infrastructure::serial::DeviceMap;
use serde_json::json;
use std::io;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_devices(&self, devices: &DeviceMap) -> Result<(), OutputError>;
    fn write_config(&self, config: &AppConfig) -> Result<(), OutputError>;
    fn write_encoded(&self, message: &str, encoded: &str) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    TomlError(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::ModemError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_devices(&self, devices: &DeviceMap) -> Result<(), OutputError> {
        println!("{}", render_devices(&self.format, devices)?);
        Ok(())
    }

    fn write_config(&self, config: &AppConfig) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
            OutputFormat::Text | OutputFormat::Table => {
                print!("{}", toml::to_string_pretty(config)?)
            }
        }
        Ok(())
    }

    fn write_encoded(&self, message: &str, encoded: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = json!({ "message": message, "encoded": encoded });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text | OutputFormat::Table => println!("{}", encoded),
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = json!({ "message": message });
                println!("{}", serde_json::to_string(&output)?);
            }
            _ => println!("{}", message),
        }
        Ok(())
    }
}

/// Render the device map in `format`
pub fn render_devices(format: &OutputFormat, devices: &DeviceMap) -> Result<String, OutputError> {
    let rendered = match format {
        OutputFormat::Text => devices
            .iter()
            .map(|(port, device)| format!("{}: {} [{}]", port, device.model, device.hwid))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            // Same shape as the enumeration result: port -> [model, hwid]
            let map: serde_json::Map<String, serde_json::Value> = devices
                .iter()
                .map(|(port, device)| (port.clone(), json!([device.model, device.hwid])))
                .collect();
            serde_json::to_string_pretty(&map)?
        }
        OutputFormat::Table => {
            let rows: Vec<DeviceTableRow> = devices
                .iter()
                .map(|(port, device)| DeviceTableRow {
                    port: port.clone(),
                    model: device.model.clone(),
                    hwid: device.hwid.clone(),
                })
                .collect();
            Table::new(rows).to_string()
        }
    };
    Ok(rendered)
}

#[derive(Tabled)]
struct DeviceTableRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Hardware ID")]
    hwid: String,
}
