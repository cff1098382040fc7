/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::fmt;

mod error;
pub use error::{SocksNegotiationError, SocksRequestParseError};

/// Authentication method code, as registered by IANA
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SocksAuthMethod(u8);

impl SocksAuthMethod {
    pub const NONE: SocksAuthMethod = SocksAuthMethod(0x00);
    pub const GSS_API: SocksAuthMethod = SocksAuthMethod(0x01);
    pub const USER: SocksAuthMethod = SocksAuthMethod(0x02);
    pub const NO_ACCEPTABLE: SocksAuthMethod = SocksAuthMethod(0xFF);

    #[inline]
    pub const fn code(&self) -> u8 {
        self.0
    }

    /// Codes in 0x80..0xFE are reserved for private methods
    #[inline]
    pub const fn is_private(&self) -> bool {
        self.0 >= 0x80 && self.0 != 0xFF
    }
}

impl From<u8> for SocksAuthMethod {
    fn from(code: u8) -> Self {
        SocksAuthMethod(code)
    }
}

impl fmt::Display for SocksAuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.write_str("None"),
            Self::GSS_API => f.write_str("GssApi"),
            Self::USER => f.write_str("User"),
            Self::NO_ACCEPTABLE => f.write_str("NoAcceptable"),
            m if m.is_private() => write!(f, "Private({:#04x})", m.0),
            m => write!(f, "Other({:#04x})", m.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SocksCommand {
    TcpConnect,
    TcpBind,
    UdpAssociate,
}

impl SocksCommand {
    const ALL: [SocksCommand; 3] = [
        SocksCommand::TcpConnect,
        SocksCommand::TcpBind,
        SocksCommand::UdpAssociate,
    ];

    pub const fn code(&self) -> u8 {
        *self as u8 + 1
    }

    pub const fn name(&self) -> &'static str {
        match self {
            SocksCommand::TcpConnect => "TcpConnect",
            SocksCommand::TcpBind => "TcpBind",
            SocksCommand::UdpAssociate => "UdpAssociate",
        }
    }
}

impl fmt::Display for SocksCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for SocksCommand {
    type Error = SocksNegotiationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        SocksCommand::ALL
            .into_iter()
            .find(|cmd| cmd.code() == code)
            .ok_or(SocksNegotiationError::InvalidCommand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_method() {
        assert_eq!(SocksAuthMethod::from(0x00), SocksAuthMethod::NONE);
        assert_eq!(SocksAuthMethod::from(0x02), SocksAuthMethod::USER);
        assert_eq!(SocksAuthMethod::from(0xFF), SocksAuthMethod::NO_ACCEPTABLE);
        assert!(SocksAuthMethod::from(0x80).is_private());
        assert!(!SocksAuthMethod::from(0x10).is_private());
        assert_eq!(SocksAuthMethod::from(0x80).to_string(), "Private(0x80)");
        assert_eq!(SocksAuthMethod::NONE.to_string(), "None");
    }

    #[test]
    fn command() {
        assert_eq!(SocksCommand::try_from(1).unwrap(), SocksCommand::TcpConnect);
        assert_eq!(SocksCommand::try_from(3).unwrap(), SocksCommand::UdpAssociate);
        assert_eq!(SocksCommand::TcpBind.code(), 0x02);
        assert!(SocksCommand::try_from(0).is_err());
        assert!(SocksCommand::try_from(4).is_err());
    }
}
