use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments for smsmodem
#[derive(Parser, Debug)]
#[command(
    name = "smsmodem",
    version = env!("CARGO_PKG_VERSION"),
    about = "Send SMS through a GSM modem over a serial port",
    long_about = "Drives a GSM modem attached over a serial link with plaintext AT commands to send SMS text messages and query the account balance."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not mirror log output to the console
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List attached serial ports
    Ports,
    /// Send a text message
    Send(SendArgs),
    /// Query the account balance over USSD
    Balance(BalanceArgs),
    /// Print the modem encoding of a message
    Encode {
        /// Message text
        message: String,
    },
    /// Configuration management commands
    Config(ConfigArgs),
    /// Display version information
    Version,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}

/// Overrides for the configured modem link
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct LinkArgs {
    /// Serial port path
    #[arg(short, long)]
    pub port: Option<String>,

    /// Baud rate; a non-standard rate keeps the configured one
    #[arg(short, long, allow_negative_numbers = true)]
    pub baud: Option<i64>,

    /// Read/write timeout in seconds (1-60); out of range keeps the configured one
    #[arg(short, long, allow_negative_numbers = true)]
    pub timeout: Option<i64>,
}

/// Message sending arguments
#[derive(ClapArgs, Debug)]
pub struct SendArgs {
    /// Destination phone number, e.g. +79627746292
    pub number: String,

    /// Message text
    pub message: String,

    #[command(flatten)]
    pub link: LinkArgs,
}

/// Balance query arguments
#[derive(ClapArgs, Debug)]
pub struct BalanceArgs {
    /// Carrier name selecting the USSD code
    #[arg(long)]
    pub carrier: Option<String>,

    #[command(flatten)]
    pub link: LinkArgs,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send() {
        let args = Args::try_parse_from([
            "smsmodem",
            "send",
            "+79627746292",
            "Hi",
            "--port",
            "/dev/ttyUSB1",
            "--baud",
            "9600",
        ])
        .unwrap();

        match args.command {
            Command::Send(send) => {
                assert_eq!(send.number, "+79627746292");
                assert_eq!(send.message, "Hi");
                assert_eq!(send.link.port.as_deref(), Some("/dev/ttyUSB1"));
                assert_eq!(send.link.baud, Some(9600));
                assert_eq!(send.link.timeout, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_balance_with_global_flags() {
        let args =
            Args::try_parse_from(["smsmodem", "-q", "balance", "--carrier", "megafon", "-v"])
                .unwrap();
        assert!(args.quiet);
        assert!(args.verbose);
        assert!(matches!(
            args.command,
            Command::Balance(BalanceArgs { carrier: Some(ref c), .. }) if c == "megafon"
        ));
    }

    #[test]
    fn test_output_format() {
        let args = Args::try_parse_from(["smsmodem", "--output", "json", "ports"]).unwrap();
        assert!(matches!(args.output, OutputFormat::Json));
        assert_eq!(args.output.to_string(), "json");
    }

    #[test]
    fn test_negative_link_values_reach_validation() {
        let args =
            Args::try_parse_from(["smsmodem", "balance", "--timeout", "-5", "--baud", "-1"])
                .unwrap();
        match args.command {
            Command::Balance(balance) => {
                assert_eq!(balance.link.timeout, Some(-5));
                assert_eq!(balance.link.baud, Some(-1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_send_requires_message() {
        assert!(Args::try_parse_from(["smsmodem", "send", "+7000"]).is_err());
    }
}
