//! AT command vocabulary and the fixed scripts built from it.

use crate::core::modem::encoding::EncodedMessage;
use std::fmt;

/// SMS-SUBMIT first octet 17, validity 167 (24h), PID 0, DCS 8 (UCS2)
pub const SMS_PARAMETERS: &str = "17,167,0,8";

/// Ctrl-Z, ends the message body
pub const MESSAGE_TERMINATOR: u8 = 0x1A;

/// USSD balance inquiry codes by carrier name
pub const BALANCE_CODES: &[(&str, &str)] = &[("megafon", "*102#")];

/// Balance inquiry code for `carrier`, case-insensitive
pub fn balance_code(carrier: &str) -> Option<&'static str> {
    BALANCE_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(carrier))
        .map(|(_, code)| *code)
}

/// One write on the modem link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtCommand {
    /// `ATZ`
    Reset,
    /// `AT+CMGF=1`
    TextMode,
    /// `AT+CSMP=...`
    SmsParameters,
    /// `AT+CMGS='<number>'`
    Recipient(String),
    /// Encoded body, written without line ending
    Body(EncodedMessage),
    /// Ctrl-Z
    Terminator,
    /// `AT+CUSD=1,'<code>',15`
    Ussd(String),
}

impl AtCommand {
    /// Bytes written to the link
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            AtCommand::Body(body) => body.as_bytes().to_vec(),
            AtCommand::Terminator => vec![MESSAGE_TERMINATOR],
            line => format!("{}\r\n", line).into_bytes(),
        }
    }
}

impl fmt::Display for AtCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtCommand::Reset => write!(f, "ATZ"),
            AtCommand::TextMode => write!(f, "AT+CMGF=1"),
            AtCommand::SmsParameters => write!(f, "AT+CSMP={}", SMS_PARAMETERS),
            AtCommand::Recipient(number) => write!(f, "AT+CMGS='{}'", number),
            AtCommand::Body(body) => write!(f, "{}", body),
            AtCommand::Terminator => write!(f, "<Ctrl-Z>"),
            AtCommand::Ussd(code) => write!(f, "AT+CUSD=1,'{}',15", code),
        }
    }
}

/// Commands that submit one text message. `number` is embedded verbatim.
pub fn send_message_script(number: &str, body: EncodedMessage) -> Vec<AtCommand> {
    vec![
        AtCommand::Reset,
        AtCommand::TextMode,
        AtCommand::SmsParameters,
        AtCommand::Recipient(number.to_string()),
        AtCommand::Body(body),
        AtCommand::Terminator,
    ]
}

/// Commands that dial the USSD balance inquiry `code`
pub fn balance_script(code: &str) -> Vec<AtCommand> {
    vec![
        AtCommand::Reset,
        AtCommand::TextMode,
        AtCommand::Ussd(code.to_string()),
    ]
}
