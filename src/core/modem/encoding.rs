use crate::domain::error::{ModemError, ModemResult};
use std::fmt;

/// Message body in the modem's UCS2 hex form: four uppercase hex digits per
/// UTF-16 code unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage(String);

impl EncodedMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode `text` for `AT+CMGS` in text mode with UCS2 data coding.
///
/// Blank text is refused with [`ModemError::EmptyMessage`].
pub fn encode_message(text: &str) -> ModemResult<EncodedMessage> {
    if text.trim().is_empty() {
        return Err(ModemError::EmptyMessage);
    }

    let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
    Ok(EncodedMessage(hex::encode_upper(bytes)))
}
