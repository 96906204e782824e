use anyhow::{Context, Result};
use wrp_core::{text, Decoded, Locator, Message};

use crate::config::{OutputMode, WireFormat};

pub fn decode_input(input: &[u8], format: WireFormat) -> Result<Decoded> {
    let decoded = match format {
        WireFormat::Raw => wrp_core::decode(input)?,
        WireFormat::Hex => {
            let encoded = std::str::from_utf8(input).context("hex input is not utf-8")?;
            let bytes = hex::decode(encoded.trim()).context("invalid hex input")?;
            wrp_core::decode(&bytes)?
        }
        WireFormat::Base64 => {
            let encoded = std::str::from_utf8(input).context("base64 input is not utf-8")?;
            text::from_base64(encoded)?
        }
    };
    log::info!("decoded {:?} message ({} wire bytes)", decoded.msg_type(), decoded.wire_len());
    Ok(decoded)
}

pub fn render_decoded(decoded: &Decoded, output: OutputMode) -> Result<String> {
    match output {
        OutputMode::Text => Ok(wrp_core::to_display_string(decoded)?),
        OutputMode::Json => {
            let mut rendered = serde_json::to_string_pretty(decoded.message())?;
            rendered.push('\n');
            Ok(rendered)
        }
    }
}

/// Encodes a JSON message description. Text formats end with a newline;
/// raw output is the bare wire bytes.
pub fn encode_json(input: &[u8], format: WireFormat) -> Result<Vec<u8>> {
    let message: Message = serde_json::from_slice(input).context("invalid message json")?;
    let wire = wrp_core::encode(&message)?;
    log::info!("encoded {:?} message into {} bytes", message.msg_type(), wire.len());
    Ok(match format {
        WireFormat::Raw => wire,
        WireFormat::Hex => format!("{}\n", hex::encode(wire)).into_bytes(),
        WireFormat::Base64 => format!("{}\n", text::to_base64(&message)?).into_bytes(),
    })
}

pub fn render_locator(locator: &str) -> Result<String> {
    let locator = Locator::split(locator.trim())
        .with_context(|| format!("cannot split locator '{}'", locator.trim()))?;
    Ok(wrp_core::locator_to_display_string(&locator)?)
}
