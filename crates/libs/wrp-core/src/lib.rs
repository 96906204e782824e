//! # wrp-core
//!
//! Web Routing Protocol (WRP) message model, msgpack codec and locator
//! parser.
//!
//! A WRP message is a single msgpack map. The `msg_type` key selects one of
//! nine variants and each variant has a fixed set of required and optional
//! keys. Encoding is byte-for-byte deterministic so that other WRP
//! implementations see identical bytes for identical messages.
//!
//! ## Wire Format
//!
//! ```text
//! { "msg_type": <int>, <required keys...>, <optional keys that are set...> }
//! ```
//!
//! | msg_type | Variant | Required keys |
//! |----------|---------|---------------|
//! | 2 | AUTH | status |
//! | 3 | REQ | dest, source, payload, transaction_uuid |
//! | 4 | EVENT | dest, source |
//! | 5-8 | CREATE / RETRIEVE / UPDATE / DELETE | dest, source, transaction_uuid |
//! | 9 | SVC_REG | service_name, url |
//! | 10 | SVC_ALIVE | - |
//!
//! ## Example
//!
//! ```rust
//! use wrp_core::{decode, encode, Auth, Message};
//!
//! let encoded = encode(&Message::Auth(Auth { status: 123 })).unwrap();
//! assert_eq!(encoded.len(), 19);
//! let decoded = decode(&encoded).unwrap();
//! assert_eq!(decoded.message(), &Message::Auth(Auth { status: 123 }));
//! ```

pub mod constants;
pub mod decode;
pub mod display;
pub mod encode;
mod error;
pub mod locator;
pub mod message;
pub mod text;
mod wire_fields;

pub use decode::decode;
pub use display::to_display_string;
pub use encode::{encode, encode_into, encoded_len};
pub use error::WrpError;
pub use locator::{locator_split, locator_to_display_string, Locator};
pub use message::{destroy, Auth, Crud, Decoded, Event, Message, MsgType, Nvp, Req, SvcReg};
