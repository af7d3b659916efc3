// smsmodem - SMS over a serial GSM modem
use clap::Parser;
use smsmodem::cli::{execute_command, Args};
use smsmodem::ModemError;

#[tokio::main]
async fn main() -> Result<(), ModemError> {
    let args = Args::parse();

    match execute_command(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
