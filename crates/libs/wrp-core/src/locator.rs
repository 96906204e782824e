//! Endpoint locators: `scheme:authority/service/app`.
//!
//! ```rust
//! use wrp_core::Locator;
//!
//! let loc = Locator::split("mac:112233445566/myService/myApp").unwrap();
//! assert_eq!(loc.scheme, "mac");
//! assert_eq!(loc.authority, "112233445566");
//! assert_eq!(loc.service, "myService");
//! assert_eq!(loc.app, "myApp");
//! ```

use core::fmt;

use crate::WrpError;

/// A parsed locator. Every field borrows from the string it was split from.
///
/// `service` and `app` are empty when the locator does not carry them. The
/// app span runs to the end of the input, so anything after it stays part
/// of `app`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Locator<'a> {
    pub scheme: &'a str,
    pub authority: &'a str,
    pub service: &'a str,
    pub app: &'a str,
}

impl<'a> Locator<'a> {
    /// Splits `locator` without allocating.
    pub fn split(locator: &'a str) -> Result<Self, WrpError> {
        if locator.is_empty() {
            return Err(WrpError::InvalidArgs);
        }

        let len = locator.len();
        let slash_0 = locator.find('/').unwrap_or(len);
        let colon = match locator[..slash_0].find(':') {
            Some(0) | None => return Err(WrpError::NoScheme),
            Some(colon) => colon,
        };
        if slash_0 - colon <= 1 {
            return Err(WrpError::NoAuthority);
        }

        let slash_1 = if slash_0 < len {
            locator[slash_0 + 1..].find('/').map_or(len, |offset| slash_0 + 1 + offset)
        } else {
            len
        };
        let service = if slash_1 - slash_0 > 1 { &locator[slash_0 + 1..slash_1] } else { "" };
        let app = if len - slash_1 > 1 { &locator[slash_1 + 1..] } else { "" };

        Ok(Self {
            scheme: &locator[..colon],
            authority: &locator[colon + 1..slash_0],
            service,
            app,
        })
    }
}

impl fmt::Display for Locator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "wrp_locator {{")?;
        writeln!(f, "    .scheme    = '{}'", self.scheme)?;
        writeln!(f, "    .authority = '{}'", self.authority)?;
        writeln!(f, "    .service   = '{}'", self.service)?;
        writeln!(f, "    .app       = '{}'", self.app)?;
        writeln!(f, "}}")
    }
}

/// Free-function form of [`Locator::split`].
pub fn locator_split(locator: &str) -> Result<Locator<'_>, WrpError> {
    Locator::split(locator)
}

/// Renders the multi-line block form of `locator`.
pub fn locator_to_display_string(locator: &Locator<'_>) -> Result<String, WrpError> {
    Ok(locator.to_string())
}
