//! Base64 text transport: the wire bytes of a message, base64 encoded with
//! the standard alphabet, for channels that only carry text.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::{decode, encode, Decoded, Message, WrpError};

pub fn to_base64(message: &Message) -> Result<String, WrpError> {
    Ok(BASE64_STANDARD.encode(encode(message)?))
}

pub fn from_base64(text: &str) -> Result<Decoded, WrpError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WrpError::InvalidArgs);
    }
    let bytes = BASE64_STANDARD.decode(text).map_err(|err| {
        log::debug!("base64 transport decode failed: {err}");
        WrpError::NotWireFormat
    })?;
    decode(&bytes)
}
