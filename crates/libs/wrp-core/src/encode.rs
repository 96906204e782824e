//! Message -> msgpack.
//!
//! Every variant writes `msg_type` first, then its required keys, then the
//! optional keys that are set. Key order is fixed per variant and existing
//! consumers compare encodings byte for byte, so it must not change.

use std::io::{self, Cursor, Write};

use crate::constants::*;
use crate::message::{Auth, Crud, Event, Message, MsgType, Req, SvcReg};
use crate::wire_fields::{list_entry, opt_entry, MapWriter};
use crate::WrpError;

/// Encodes `message` into a freshly allocated buffer of exactly the encoded
/// size.
pub fn encode(message: &Message) -> Result<Vec<u8>, WrpError> {
    let mut counter = ByteCounter::default();
    write_message(&mut counter, message)?;

    let mut out = Vec::new();
    out.try_reserve_exact(counter.len).map_err(|_| WrpError::OutOfMemory)?;
    write_message(&mut out, message)?;
    log::trace!("encoded {:?} message into {} bytes", message.msg_type(), out.len());
    Ok(out)
}

/// Encodes `message` into the caller's buffer and returns the number of
/// bytes written. A buffer that cannot hold the whole encoding yields
/// [`WrpError::MsgTooBig`]; its contents are unspecified afterwards.
pub fn encode_into(message: &Message, buf: &mut [u8]) -> Result<usize, WrpError> {
    if buf.is_empty() {
        return Err(WrpError::InvalidArgs);
    }
    let mut cursor = Cursor::new(buf);
    write_message(&mut cursor, message)?;
    let written = usize::try_from(cursor.position()).map_err(|_| WrpError::OtherError)?;
    log::trace!(
        "encoded {:?} message into {written} of {} bytes",
        message.msg_type(),
        cursor.get_ref().len()
    );
    Ok(written)
}

/// Exact encoded size of `message`.
pub fn encoded_len(message: &Message) -> Result<usize, WrpError> {
    let mut counter = ByteCounter::default();
    write_message(&mut counter, message)?;
    Ok(counter.len)
}

fn write_message<W: Write>(wr: &mut W, message: &Message) -> Result<(), WrpError> {
    match message {
        Message::Auth(auth) => write_auth(wr, auth),
        Message::Req(req) => write_req(wr, req),
        Message::Event(event) => write_event(wr, event),
        Message::Create(crud)
        | Message::Retrieve(crud)
        | Message::Update(crud)
        | Message::Delete(crud) => write_crud(wr, message.msg_type(), crud),
        Message::SvcReg(reg) => write_svc_reg(wr, reg),
        Message::SvcAlive => MapWriter::begin(wr, 1)?.msg_type(MsgType::SvcAlive),
    }
}

fn write_auth<W: Write>(wr: &mut W, auth: &Auth) -> Result<(), WrpError> {
    let mut map = MapWriter::begin(wr, 2)?;
    map.msg_type(MsgType::Auth)?;
    map.int(KEY_STATUS, i64::from(auth.status))
}

fn write_req<W: Write>(wr: &mut W, req: &Req) -> Result<(), WrpError> {
    let entries = 5
        + opt_entry(&req.accept)
        + opt_entry(&req.content_type)
        + list_entry(&req.headers)
        + list_entry(&req.metadata)
        + opt_entry(&req.msg_id)
        + list_entry(&req.partner_ids)
        + opt_entry(&req.rdr)
        + opt_entry(&req.session_id)
        + opt_entry(&req.status);

    let mut map = MapWriter::begin(wr, entries)?;
    map.msg_type(MsgType::Req)?;
    map.str(KEY_DEST, &req.dest)?;
    map.str(KEY_SOURCE, &req.source)?;
    map.bin(KEY_PAYLOAD, &req.payload)?;
    map.str(KEY_TRANS_ID, &req.trans_id)?;

    map.opt_str(KEY_ACCEPT, req.accept.as_deref())?;
    map.opt_str(KEY_CONTENT_TYPE, req.content_type.as_deref())?;
    map.str_list(KEY_HEADERS, &req.headers)?;
    map.nvp_list(KEY_METADATA, &req.metadata)?;
    map.opt_str(KEY_MSG_ID, req.msg_id.as_deref())?;
    map.str_list(KEY_PARTNER_IDS, &req.partner_ids)?;
    map.opt_int(KEY_RDR, req.rdr)?;
    map.opt_str(KEY_SESSION_ID, req.session_id.as_deref())?;
    map.opt_int(KEY_STATUS, req.status)
}

fn write_event<W: Write>(wr: &mut W, event: &Event) -> Result<(), WrpError> {
    let entries = 3
        + opt_entry(&event.content_type)
        + list_entry(&event.headers)
        + list_entry(&event.metadata)
        + opt_entry(&event.msg_id)
        + list_entry(&event.partner_ids)
        + opt_entry(&event.payload)
        + opt_entry(&event.rdr)
        + opt_entry(&event.session_id)
        + opt_entry(&event.trans_id);

    let mut map = MapWriter::begin(wr, entries)?;
    map.msg_type(MsgType::Event)?;
    map.str(KEY_DEST, &event.dest)?;
    map.str(KEY_SOURCE, &event.source)?;

    map.opt_str(KEY_CONTENT_TYPE, event.content_type.as_deref())?;
    map.str_list(KEY_HEADERS, &event.headers)?;
    map.nvp_list(KEY_METADATA, &event.metadata)?;
    map.opt_str(KEY_MSG_ID, event.msg_id.as_deref())?;
    map.str_list(KEY_PARTNER_IDS, &event.partner_ids)?;
    map.opt_bin(KEY_PAYLOAD, event.payload.as_deref())?;
    map.opt_int(KEY_RDR, event.rdr)?;
    map.opt_str(KEY_SESSION_ID, event.session_id.as_deref())?;
    map.opt_str(KEY_TRANS_ID, event.trans_id.as_deref())
}

fn write_crud<W: Write>(wr: &mut W, msg_type: MsgType, crud: &Crud) -> Result<(), WrpError> {
    let entries = 4
        + opt_entry(&crud.accept)
        + opt_entry(&crud.content_type)
        + list_entry(&crud.headers)
        + list_entry(&crud.metadata)
        + opt_entry(&crud.msg_id)
        + list_entry(&crud.partner_ids)
        + opt_entry(&crud.path)
        + opt_entry(&crud.payload)
        + opt_entry(&crud.rdr)
        + opt_entry(&crud.session_id)
        + opt_entry(&crud.status);

    let mut map = MapWriter::begin(wr, entries)?;
    map.msg_type(msg_type)?;
    map.str(KEY_DEST, &crud.dest)?;
    map.str(KEY_SOURCE, &crud.source)?;
    map.str(KEY_TRANS_ID, &crud.trans_id)?;

    map.opt_str(KEY_ACCEPT, crud.accept.as_deref())?;
    map.opt_str(KEY_CONTENT_TYPE, crud.content_type.as_deref())?;
    map.str_list(KEY_HEADERS, &crud.headers)?;
    map.nvp_list(KEY_METADATA, &crud.metadata)?;
    map.opt_str(KEY_MSG_ID, crud.msg_id.as_deref())?;
    map.str_list(KEY_PARTNER_IDS, &crud.partner_ids)?;
    map.opt_str(KEY_PATH, crud.path.as_deref())?;
    map.opt_bin(KEY_PAYLOAD, crud.payload.as_deref())?;
    map.opt_int(KEY_RDR, crud.rdr)?;
    map.opt_str(KEY_SESSION_ID, crud.session_id.as_deref())?;
    map.opt_int(KEY_STATUS, crud.status)
}

fn write_svc_reg<W: Write>(wr: &mut W, reg: &SvcReg) -> Result<(), WrpError> {
    let mut map = MapWriter::begin(wr, 3)?;
    map.msg_type(MsgType::SvcReg)?;
    map.str(KEY_SERVICE_NAME, &reg.service_name)?;
    map.str(KEY_URL, &reg.url)
}

/// Sink that only counts bytes, used to size the output exactly.
#[derive(Default)]
struct ByteCounter {
    len: usize,
}

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.len = self.len.checked_add(buf.len()).ok_or_else(|| {
            io::Error::new(io::ErrorKind::OutOfMemory, "encoded size overflows usize")
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
