mod types;

use core::ops::Deref;

use serde::{Deserialize, Serialize};

pub use types::MsgType;

use crate::WrpError;

/// A name/value pair from a `metadata` map.
///
/// `value` keeps absence (`None`, nil on the wire) apart from an explicit
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nvp {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Nvp {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: Some(value.into()) }
    }

    pub fn absent(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub status: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Req {
    pub dest: String,
    pub source: String,
    #[serde(default)]
    pub payload: Vec<u8>,
    #[serde(rename = "transaction_uuid")]
    pub trans_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Nvp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partner_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdr: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub dest: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Nvp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partner_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdr: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, rename = "transaction_uuid", skip_serializing_if = "Option::is_none")]
    pub trans_id: Option<String>,
}

/// Shared shape of CREATE, RETRIEVE, UPDATE and DELETE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crud {
    pub dest: String,
    pub source: String,
    #[serde(rename = "transaction_uuid")]
    pub trans_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Nvp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partner_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdr: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvcReg {
    pub service_name: String,
    pub url: String,
}

/// A WRP message.
///
/// Values built by callers are plain owned data and need no teardown. Values
/// produced by [`crate::decode`] arrive wrapped in [`Decoded`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg_type", rename_all = "snake_case")]
pub enum Message {
    Auth(Auth),
    Req(Req),
    Event(Event),
    Create(Crud),
    Retrieve(Crud),
    Update(Crud),
    Delete(Crud),
    SvcReg(SvcReg),
    SvcAlive,
}

impl Message {
    pub fn msg_type(&self) -> MsgType {
        match self {
            Message::Auth(_) => MsgType::Auth,
            Message::Req(_) => MsgType::Req,
            Message::Event(_) => MsgType::Event,
            Message::Create(_) => MsgType::Create,
            Message::Retrieve(_) => MsgType::Retrieve,
            Message::Update(_) => MsgType::Update,
            Message::Delete(_) => MsgType::Delete,
            Message::SvcReg(_) => MsgType::SvcReg,
            Message::SvcAlive => MsgType::SvcAlive,
        }
    }

    /// Builds the CRUD variant selected by `msg_type`.
    pub fn crud(msg_type: MsgType, crud: Crud) -> Result<Self, WrpError> {
        match msg_type {
            MsgType::Create => Ok(Message::Create(crud)),
            MsgType::Retrieve => Ok(Message::Retrieve(crud)),
            MsgType::Update => Ok(Message::Update(crud)),
            MsgType::Delete => Ok(Message::Delete(crud)),
            _ => Err(WrpError::NotAWrpMessage),
        }
    }

    pub fn dest(&self) -> Option<&str> {
        match self {
            Message::Req(req) => Some(&req.dest),
            Message::Event(event) => Some(&event.dest),
            Message::Create(crud)
            | Message::Retrieve(crud)
            | Message::Update(crud)
            | Message::Delete(crud) => Some(&crud.dest),
            Message::Auth(_) | Message::SvcReg(_) | Message::SvcAlive => None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Message::Req(req) => Some(&req.source),
            Message::Event(event) => Some(&event.source),
            Message::Create(crud)
            | Message::Retrieve(crud)
            | Message::Update(crud)
            | Message::Delete(crud) => Some(&crud.source),
            Message::Auth(_) | Message::SvcReg(_) | Message::SvcAlive => None,
        }
    }
}

/// A message produced by the decoder.
///
/// Every string, blob and list is copied out of the wire buffer while
/// decoding, so the message stays valid after the caller releases that
/// buffer. The wire buffer itself is never owned here: releasing it remains
/// the caller's job, and [`destroy`] only releases what the decoder
/// allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    message: Message,
    wire_len: usize,
}

impl Decoded {
    pub(crate) fn new(message: Message, wire_len: usize) -> Self {
        Self { message, wire_len }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Length of the wire buffer this message was decoded from.
    pub fn wire_len(&self) -> usize {
        self.wire_len
    }

    pub fn into_message(self) -> Message {
        self.message
    }
}

impl Deref for Decoded {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}

impl AsRef<Message> for Decoded {
    fn as_ref(&self) -> &Message {
        &self.message
    }
}

/// Releases everything the decoder allocated for `message`.
///
/// `None` is a no-op. Only [`Decoded`] values are accepted, so caller-built
/// messages cannot reach this function, and a value cannot be destroyed
/// twice because it is moved in.
pub fn destroy(message: Option<Decoded>) -> Result<(), WrpError> {
    if let Some(decoded) = message {
        log::trace!(
            "releasing decoded {:?} message ({} wire bytes)",
            decoded.msg_type(),
            decoded.wire_len
        );
        drop(decoded);
    }
    Ok(())
}
