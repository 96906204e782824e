//! msgpack -> Message.
//!
//! Decoding is all-or-nothing: the whole buffer must hold exactly one
//! msgpack map, `msg_type` must name a known variant, and every required
//! field of that variant must be present with the right wire type. Anything
//! else fails without returning a partial message.

use std::io::Cursor;

use rmpv::Value;

use crate::constants::*;
use crate::message::{Auth, Crud, Decoded, Event, Message, MsgType, Req, SvcReg};
use crate::wire_fields::WireMap;
use crate::WrpError;

/// Nesting limit for the parsed tree. A message is a map holding at most
/// one more level (metadata map or string array).
const MAX_WIRE_DEPTH: usize = 8;

/// Decodes one message from `bytes`.
///
/// The returned message owns copies of all its strings, blobs and lists;
/// `bytes` is only read and stays owned by the caller.
pub fn decode(bytes: &[u8]) -> Result<Decoded, WrpError> {
    if bytes.is_empty() {
        return Err(WrpError::InvalidArgs);
    }

    let tree = read_tree(bytes)?;
    let Value::Map(entries) = &tree else {
        log::debug!("top-level msgpack value is not a map: {tree}");
        return Err(WrpError::NotAWrpMessage);
    };

    let fields = WireMap::new(entries)?;
    let msg_type = fields.msg_type()?;
    let message = match msg_type {
        MsgType::Auth => Message::Auth(decode_auth(&fields)?),
        MsgType::Req => Message::Req(decode_req(&fields)?),
        MsgType::Event => Message::Event(decode_event(&fields)?),
        MsgType::Create | MsgType::Retrieve | MsgType::Update | MsgType::Delete => {
            Message::crud(msg_type, decode_crud(&fields)?)?
        }
        MsgType::SvcReg => Message::SvcReg(decode_svc_reg(&fields)?),
        MsgType::SvcAlive => Message::SvcAlive,
    };

    log::trace!("decoded {msg_type:?} message from {} bytes", bytes.len());
    Ok(Decoded::new(message, bytes.len()))
}

fn read_tree(bytes: &[u8]) -> Result<Value, WrpError> {
    let mut cursor = Cursor::new(bytes);
    let tree =
        rmpv::decode::read_value_with_max_depth(&mut cursor, MAX_WIRE_DEPTH).map_err(|err| {
            log::debug!("msgpack parse failed: {err}");
            WrpError::NotWireFormat
        })?;
    if usize::try_from(cursor.position()).ok() != Some(bytes.len()) {
        log::debug!(
            "{} trailing bytes after wrp message",
            bytes.len() as u64 - cursor.position()
        );
        return Err(WrpError::NotWireFormat);
    }
    Ok(tree)
}

fn decode_auth(fields: &WireMap<'_>) -> Result<Auth, WrpError> {
    Ok(Auth { status: fields.required_int(KEY_STATUS)? })
}

fn decode_req(fields: &WireMap<'_>) -> Result<Req, WrpError> {
    Ok(Req {
        dest: fields.required_str(KEY_DEST)?,
        source: fields.required_str(KEY_SOURCE)?,
        payload: fields.required_bin(KEY_PAYLOAD)?,
        trans_id: fields.required_str(KEY_TRANS_ID)?,
        accept: fields.optional_str(KEY_ACCEPT)?,
        content_type: fields.optional_str(KEY_CONTENT_TYPE)?,
        headers: fields.str_list(KEY_HEADERS)?,
        metadata: fields.nvp_list(KEY_METADATA)?,
        msg_id: fields.optional_str(KEY_MSG_ID)?,
        partner_ids: fields.str_list(KEY_PARTNER_IDS)?,
        rdr: fields.optional_int(KEY_RDR)?,
        session_id: fields.optional_str(KEY_SESSION_ID)?,
        status: fields.optional_int(KEY_STATUS)?,
    })
}

fn decode_event(fields: &WireMap<'_>) -> Result<Event, WrpError> {
    Ok(Event {
        dest: fields.required_str(KEY_DEST)?,
        source: fields.required_str(KEY_SOURCE)?,
        content_type: fields.optional_str(KEY_CONTENT_TYPE)?,
        headers: fields.str_list(KEY_HEADERS)?,
        metadata: fields.nvp_list(KEY_METADATA)?,
        msg_id: fields.optional_str(KEY_MSG_ID)?,
        partner_ids: fields.str_list(KEY_PARTNER_IDS)?,
        payload: fields.optional_bin(KEY_PAYLOAD)?,
        rdr: fields.optional_int(KEY_RDR)?,
        session_id: fields.optional_str(KEY_SESSION_ID)?,
        trans_id: fields.optional_str(KEY_TRANS_ID)?,
    })
}

fn decode_crud(fields: &WireMap<'_>) -> Result<Crud, WrpError> {
    Ok(Crud {
        dest: fields.required_str(KEY_DEST)?,
        source: fields.required_str(KEY_SOURCE)?,
        trans_id: fields.required_str(KEY_TRANS_ID)?,
        accept: fields.optional_str(KEY_ACCEPT)?,
        content_type: fields.optional_str(KEY_CONTENT_TYPE)?,
        headers: fields.str_list(KEY_HEADERS)?,
        metadata: fields.nvp_list(KEY_METADATA)?,
        msg_id: fields.optional_str(KEY_MSG_ID)?,
        partner_ids: fields.str_list(KEY_PARTNER_IDS)?,
        path: fields.optional_str(KEY_PATH)?,
        payload: fields.optional_bin(KEY_PAYLOAD)?,
        rdr: fields.optional_int(KEY_RDR)?,
        session_id: fields.optional_str(KEY_SESSION_ID)?,
        status: fields.optional_int(KEY_STATUS)?,
    })
}

fn decode_svc_reg(fields: &WireMap<'_>) -> Result<SvcReg, WrpError> {
    Ok(SvcReg {
        service_name: fields.required_str(KEY_SERVICE_NAME)?,
        url: fields.required_str(KEY_URL)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(pairs: Vec<(&str, Value)>) -> Vec<u8> {
        let map = Value::Map(pairs.into_iter().map(|(k, v)| (Value::from(k), v)).collect());
        let mut out = Vec::new();
        rmpv::encode::write_value(&mut out, &map).expect("write test value");
        out
    }

    #[test]
    fn decodes_reference_auth() {
        let bytes = [&[0x82, 0xa8][..], b"msg_type", &[0x02, 0xa6], b"status", &[0x7b]].concat();
        let decoded = decode(&bytes).expect("decode");
        assert_eq!(decoded.message(), &Message::Auth(Auth { status: 123 }));
        assert_eq!(decoded.wire_len(), 19);
    }

    #[test]
    fn empty_input_is_invalid() {
        assert_eq!(decode(&[]), Err(WrpError::InvalidArgs));
    }

    #[test]
    fn truncated_input_is_not_msgpack() {
        let bytes = [&[0x82, 0xa8][..], b"msg_type", &[0x02, 0xa6], b"stat"].concat();
        assert_eq!(decode(&bytes), Err(WrpError::NotWireFormat));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = wire(vec![("msg_type", Value::from(10))]);
        bytes.push(0xc0);
        assert_eq!(decode(&bytes), Err(WrpError::NotWireFormat));
    }

    #[test]
    fn non_map_is_not_a_wrp_message() {
        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, &Value::from("hello")).expect("write");
        assert_eq!(decode(&bytes), Err(WrpError::NotAWrpMessage));
    }

    #[test]
    fn missing_msg_type_fails() {
        let bytes = wire(vec![("status", Value::from(1))]);
        assert_eq!(decode(&bytes), Err(WrpError::NotAWrpMessage));
    }

    #[test]
    fn unknown_msg_type_fails() {
        let bytes = wire(vec![("msg_type", Value::from(1))]);
        assert_eq!(decode(&bytes), Err(WrpError::NotAWrpMessage));
    }

    #[test]
    fn auth_without_status_fails() {
        let bytes = wire(vec![("msg_type", Value::from(2))]);
        assert_eq!(decode(&bytes), Err(WrpError::NotAWrpMessage));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let bytes = wire(vec![
            ("msg_type", Value::from(9)),
            ("service_name", Value::from("config")),
            ("url", Value::from("tcp://127.0.0.1:6666")),
            ("x-future", Value::Array(vec![Value::from(1.5)])),
        ]);
        let decoded = decode(&bytes).expect("decode");
        assert_eq!(
            decoded.into_message(),
            Message::SvcReg(SvcReg {
                service_name: "config".into(),
                url: "tcp://127.0.0.1:6666".into()
            })
        );
    }

    #[test]
    fn crud_tag_selects_variant() {
        for (raw, expected) in [
            (5, MsgType::Create),
            (6, MsgType::Retrieve),
            (7, MsgType::Update),
            (8, MsgType::Delete),
        ] {
            let bytes = wire(vec![
                ("msg_type", Value::from(raw)),
                ("dest", Value::from("d")),
                ("source", Value::from("s")),
                ("transaction_uuid", Value::from("t")),
            ]);
            assert_eq!(decode(&bytes).expect("decode").msg_type(), expected);
        }
    }
}
