//! Wire key tokens and message type discriminants.

pub const KEY_MSG_TYPE: &str = "msg_type";
pub const KEY_SOURCE: &str = "source";
pub const KEY_DEST: &str = "dest";
pub const KEY_CONTENT_TYPE: &str = "content_type";
pub const KEY_PARTNER_IDS: &str = "partner_ids";
pub const KEY_PAYLOAD: &str = "payload";
pub const KEY_METADATA: &str = "metadata";
pub const KEY_TRANS_ID: &str = "transaction_uuid";
pub const KEY_ACCEPT: &str = "accept";
pub const KEY_STATUS: &str = "status";
pub const KEY_RDR: &str = "rdr";
pub const KEY_PATH: &str = "path";
pub const KEY_SERVICE_NAME: &str = "service_name";
pub const KEY_URL: &str = "url";
pub const KEY_HEADERS: &str = "headers";
pub const KEY_MSG_ID: &str = "msg_id";
pub const KEY_SESSION_ID: &str = "session_id";

pub const MSG_TYPE_AUTH: u8 = 2;
pub const MSG_TYPE_REQ: u8 = 3;
pub const MSG_TYPE_EVENT: u8 = 4;
pub const MSG_TYPE_CREATE: u8 = 5;
pub const MSG_TYPE_RETRIEVE: u8 = 6;
pub const MSG_TYPE_UPDATE: u8 = 7;
pub const MSG_TYPE_DELETE: u8 = 8;
pub const MSG_TYPE_SVC_REG: u8 = 9;
pub const MSG_TYPE_SVC_ALIVE: u8 = 10;
