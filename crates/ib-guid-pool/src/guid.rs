//! InfiniBand GUID codec
//!
//! A GUID is a 64-bit hardware address written as eight colon-separated
//! two-digit hex octets, most-significant octet first
//! (`02:00:00:00:00:00:00:0A`). Parsing accepts either hex case; formatting
//! always produces uppercase.

use crate::error::GuidPoolError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of octets in a GUID
const OCTETS: usize = 8;

/// InfiniBand GUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Guid(u64);

impl Guid {
    /// Most-significant octet reserved for multicast addresses
    pub const MULTICAST_PREFIX_OCTET: u8 = 0xFF;

    /// Create a GUID from its numeric value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric value of the GUID
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Parse the colon-hex text form
    ///
    /// Exactly eight `:`-separated octets of two hex digits each are
    /// accepted. Anything else (wrong octet count, other separators,
    /// whitespace, non-hex digits) is rejected.
    pub fn parse(text: &str) -> Result<Self, GuidPoolError> {
        let malformed = || GuidPoolError::InvalidGuidFormat(text.to_string());

        let mut value: u64 = 0;
        let mut count = 0;
        for octet in text.split(':') {
            count += 1;
            if count > OCTETS || octet.len() != 2 || !octet.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(malformed());
            }
            let byte = u8::from_str_radix(octet, 16).map_err(|_| malformed())?;
            value = (value << 8) | u64::from(byte);
        }

        if count != OCTETS {
            return Err(malformed());
        }
        Ok(Self(value))
    }

    /// Whether the GUID may be used as a pool bound or be allocated
    ///
    /// The all-zero GUID and any GUID carrying the multicast prefix in its
    /// most-significant octet are reserved.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self.0 != 0 && self.0.to_be_bytes()[0] != Self::MULTICAST_PREFIX_OCTET
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let octets = self.0.to_be_bytes();
        for (i, octet) in octets.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{octet:02X}")?;
        }
        Ok(())
    }
}

impl FromStr for Guid {
    type Err = GuidPoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for Guid {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Guid> for u64 {
    fn from(guid: Guid) -> Self {
        guid.0
    }
}

impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
