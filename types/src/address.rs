//! Account address type with the `tru1` prefix.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A TruStory account address, always prefixed with `tru1`.
///
/// Addresses are opaque to the staking engine: they are compared, hashed and
/// used as index keys, never decoded.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// The standard prefix for all TruStory account addresses.
    pub const PREFIX: &'static str = "tru1";

    /// Longest address accepted; keeps index keys length-prefixable in one byte.
    pub const MAX_LEN: usize = 64;

    /// Create a new account address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed address. Use
    /// [`AccountAddress::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(Self::well_formed(&s), "address must start with tru1");
        Self(s)
    }

    /// Parse an address, rejecting a missing prefix, an empty body or an
    /// over-long string.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if Self::well_formed(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypesError::InvalidAddress(raw.to_string()))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        Self::well_formed(&self.0)
    }

    fn well_formed(s: &str) -> bool {
        s.starts_with(Self::PREFIX)
            && s.len() > Self::PREFIX.len()
            && s.len() <= Self::MAX_LEN
            && s.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = TypesError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if Self::well_formed(&raw) {
            Ok(Self(raw))
        } else {
            Err(TypesError::InvalidAddress(raw))
        }
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
