use crate::cli::args::{Args, BalanceArgs, Command, ConfigCommand, LinkArgs, SendArgs};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::communication::{Pause, Transport};
use crate::core::modem::{encode_message, Connection};
use crate::domain::config::{AppConfig, ModemConfig};
use crate::domain::error::{ModemError, ModemResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::LogContext;
use crate::infrastructure::serial::{list_devices, DeviceMap, SerialTransport};
use std::future::Future;
use tracing::{error, warn};

/// Execute CLI command
pub async fn execute_command(args: Args) -> ModemResult<()> {
    let writer = ConsoleWriter::new(args.output.clone());

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = config_manager.load_config()?;
    if let Some(path) = &args.log_file {
        config.logging.file = Some(path.clone());
    }
    if args.quiet {
        config.logging.console = false;
    }

    match args.command {
        Command::Ports => {
            let log = LogContext::new(&config.logging, args.verbose)?;
            match log.in_scope(list_devices) {
                Ok(devices) => writer.write_devices(&devices)?,
                Err(ModemError::NoPortsFound) => writer.write_message("No serial port found")?,
                Err(e) => return Err(e),
            }
            Ok(())
        }
        Command::Send(send_args) => {
            let log = LogContext::new(&config.logging, args.verbose)?;
            execute_send_command(send_args, &config, log).await
        }
        Command::Balance(balance_args) => {
            let log = LogContext::new(&config.logging, args.verbose)?;
            execute_balance_command(balance_args, &config, log).await
        }
        Command::Encode { message } => {
            let encoded = encode_message(&message)?;
            writer.write_encoded(&message, encoded.as_str())?;
            Ok(())
        }
        Command::Config(config_args) => match config_args.command {
            ConfigCommand::Show => {
                writer.write_config(&config)?;
                Ok(())
            }
            ConfigCommand::Init { output } => {
                let path = config_manager.init_config(output.as_deref())?;
                writer.write_message(&format!(
                    "Configuration initialized at '{}'",
                    path.display()
                ))?;
                Ok(())
            }
        },
        Command::Version => {
            writer.write_message(&format!("smsmodem {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

async fn execute_send_command(
    args: SendArgs,
    config: &AppConfig,
    log: LogContext,
) -> ModemResult<()> {
    let Some(connection) = open_configured_port(&args.link, config, None, &log) else {
        return Ok(());
    };

    let SendArgs { number, message, .. } = args;
    run_operation(connection, log, move |modem| {
        modem.send_message(&number, &message)
    })
    .await
}

async fn execute_balance_command(
    args: BalanceArgs,
    config: &AppConfig,
    log: LogContext,
) -> ModemResult<()> {
    let Some(connection) = open_configured_port(&args.link, config, args.carrier, &log) else {
        return Ok(());
    };

    run_operation(connection, log, |modem| modem.get_balance()).await
}

/// Resolve the link settings and build a connection when the port is attached
fn open_configured_port(
    link: &LinkArgs,
    config: &AppConfig,
    carrier: Option<String>,
    log: &LogContext,
) -> Option<Connection<SerialTransport>> {
    let modem_config = log.in_scope(|| modem_config(config, link));
    let devices = log.in_scope(list_devices);
    if !log.in_scope(|| port_attached(devices, modem_config.port())) {
        return None;
    }

    let connection = Connection::new(modem_config, SerialTransport::new(), log.clone())
        .with_pacing(config.pacing.clone())
        .with_carrier(carrier.unwrap_or_else(|| config.modem.carrier.clone()));
    Some(connection)
}

/// Configured settings with command-line overrides applied.
///
/// A rejected override keeps the configured value.
pub fn modem_config(config: &AppConfig, link: &LinkArgs) -> ModemConfig {
    let mut modem_config = config.modem.to_modem_config();
    if let Some(port) = &link.port {
        modem_config.set_port(port.clone());
    }
    if let Some(baud) = link.baud {
        modem_config.set_baud_rate(baud);
    }
    if let Some(timeout) = link.timeout {
        modem_config.set_timeout(timeout);
    }
    modem_config
}

/// Whether `port` is among the enumerated devices, logging why not
pub fn port_attached(devices: ModemResult<DeviceMap>, port: &str) -> bool {
    match devices {
        Ok(devices) if devices.contains_key(port) => true,
        Ok(_) => {
            warn!("Port used for connection does not exist: {}", port);
            false
        }
        Err(ModemError::NoPortsFound) => {
            warn!("No attached usb gsm modem found");
            false
        }
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}

/// Connect, run `operation`, disconnect, all on a blocking worker.
///
/// Ctrl-C abandons the whole operation; the sequence itself is never split.
pub async fn run_operation<T, P, F>(
    connection: Connection<T, P>,
    log: LogContext,
    operation: F,
) -> ModemResult<()>
where
    T: Transport + 'static,
    P: Pause + 'static,
    F: FnOnce(&mut Connection<T, P>) + Send + 'static,
{
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    run_until_interrupted(connection, log, operation, ctrl_c).await
}

/// [`run_operation`] with the interrupt source supplied by the caller
pub async fn run_until_interrupted<T, P, F, I>(
    mut connection: Connection<T, P>,
    log: LogContext,
    operation: F,
    interrupt: I,
) -> ModemResult<()>
where
    T: Transport + 'static,
    P: Pause + 'static,
    F: FnOnce(&mut Connection<T, P>) + Send + 'static,
    I: Future<Output = ()>,
{
    let task = tokio::task::spawn_blocking(move || {
        connection.connect();
        operation(&mut connection);
        connection.disconnect();
        connection
    });

    tokio::select! {
        joined = task => {
            joined.map_err(|e| {
                ModemError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })?;
            Ok(())
        }
        _ = interrupt => {
            log.in_scope(|| warn!("Interrupted, the modem may be left mid-sequence"));
            Err(ModemError::Interrupted)
        }
    }
}
