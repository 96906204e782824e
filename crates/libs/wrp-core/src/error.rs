/// Errors from WRP codec and locator operations.
///
/// The numeric codes returned by [`WrpError::code`] are stable; `0` is
/// reserved for success and is never produced by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum WrpError {
    #[error("out of memory")]
    OutOfMemory,

    #[error("input is not valid msgpack")]
    NotWireFormat,

    #[error("encoded message does not fit the supplied buffer")]
    MsgTooBig,

    #[error("unspecified wrp error")]
    OtherError,

    #[error("input is not a wrp message")]
    NotAWrpMessage,

    #[error("invalid arguments")]
    InvalidArgs,

    #[error("message was not produced by this library")]
    NotFromThisLibrary,

    #[error("locator has no scheme")]
    NoScheme,

    #[error("locator has no authority")]
    NoAuthority,
}

impl WrpError {
    pub fn code(self) -> i32 {
        match self {
            Self::OutOfMemory => 1,
            Self::NotWireFormat => 2,
            Self::MsgTooBig => 3,
            Self::OtherError => 4,
            Self::NotAWrpMessage => 5,
            Self::InvalidArgs => 6,
            Self::NotFromThisLibrary => 7,
            Self::NoScheme => 8,
            Self::NoAuthority => 9,
        }
    }

    /// Maps a numeric code back to an error. `0` (success) and unknown
    /// codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::OutOfMemory),
            2 => Some(Self::NotWireFormat),
            3 => Some(Self::MsgTooBig),
            4 => Some(Self::OtherError),
            5 => Some(Self::NotAWrpMessage),
            6 => Some(Self::InvalidArgs),
            7 => Some(Self::NotFromThisLibrary),
            8 => Some(Self::NoScheme),
            9 => Some(Self::NoAuthority),
            _ => None,
        }
    }
}
