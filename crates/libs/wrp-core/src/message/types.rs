use crate::constants::{
    MSG_TYPE_AUTH, MSG_TYPE_CREATE, MSG_TYPE_DELETE, MSG_TYPE_EVENT, MSG_TYPE_REQ,
    MSG_TYPE_RETRIEVE, MSG_TYPE_SVC_ALIVE, MSG_TYPE_SVC_REG, MSG_TYPE_UPDATE,
};
use crate::WrpError;

/// Discriminant carried in the `msg_type` key of every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MsgType {
    Auth = MSG_TYPE_AUTH,
    Req = MSG_TYPE_REQ,
    Event = MSG_TYPE_EVENT,
    Create = MSG_TYPE_CREATE,
    Retrieve = MSG_TYPE_RETRIEVE,
    Update = MSG_TYPE_UPDATE,
    Delete = MSG_TYPE_DELETE,
    SvcReg = MSG_TYPE_SVC_REG,
    SvcAlive = MSG_TYPE_SVC_ALIVE,
}

impl MsgType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Name used for the pretty-printed block header.
    pub fn block_name(self) -> &'static str {
        match self {
            MsgType::Auth => "wrp_auth",
            MsgType::Req => "wrp_req",
            MsgType::Event => "wrp_event",
            MsgType::Create => "wrp_create",
            MsgType::Retrieve => "wrp_retrieve",
            MsgType::Update => "wrp_update",
            MsgType::Delete => "wrp_delete",
            MsgType::SvcReg => "wrp_svc_reg",
            MsgType::SvcAlive => "wrp_svc_alive",
        }
    }
}

impl TryFrom<u8> for MsgType {
    type Error = WrpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            MSG_TYPE_AUTH => Ok(MsgType::Auth),
            MSG_TYPE_REQ => Ok(MsgType::Req),
            MSG_TYPE_EVENT => Ok(MsgType::Event),
            MSG_TYPE_CREATE => Ok(MsgType::Create),
            MSG_TYPE_RETRIEVE => Ok(MsgType::Retrieve),
            MSG_TYPE_UPDATE => Ok(MsgType::Update),
            MSG_TYPE_DELETE => Ok(MsgType::Delete),
            MSG_TYPE_SVC_REG => Ok(MsgType::SvcReg),
            MSG_TYPE_SVC_ALIVE => Ok(MsgType::SvcAlive),
            _ => Err(WrpError::NotAWrpMessage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_roundtrip() {
        for raw in 2u8..=10 {
            let msg_type = MsgType::try_from(raw).expect("known discriminant");
            assert_eq!(msg_type.as_u8(), raw);
        }
    }

    #[test]
    fn unknown_discriminants_are_rejected() {
        for raw in [0u8, 1, 11, 0xFF] {
            assert_eq!(MsgType::try_from(raw), Err(WrpError::NotAWrpMessage));
        }
    }
}
