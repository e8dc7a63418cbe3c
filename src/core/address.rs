//! Contract and account addresses
//!
//! Addresses are opaque 25-byte values. They are displayed and parsed as
//! base58, which is also the form used in downstream failure messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of an address in bytes
pub const ADDRESS_SIZE: usize = 25;

/// Account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    /// Create from raw bytes
    pub fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Address(bytes)
    }

    /// Build an address from a variable-length slice (wire payloads)
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressParseError> {
        if bytes.len() != ADDRESS_SIZE {
            return Err(AddressParseError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Address(arr))
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Owned byte vector, as carried in protobuf `bytes` fields
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Convert to base58 string
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    /// Parse from a base58 string
    pub fn from_base58(s: &str) -> Result<Self, AddressParseError> {
        let bytes = bs58::decode(s).into_vec()?;
        Self::from_slice(&bytes)
    }
}

/// Address parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("Base58 error: {0}")]
    Base58(String),

    #[error("Invalid address length: {0} (expected 25)")]
    InvalidLength(usize),
}

impl From<bs58::decode::Error> for AddressParseError {
    fn from(e: bs58::decode::Error) -> Self {
        AddressParseError::Base58(e.to_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.to_base58();
        write!(f, "Address({}...)", &encoded[..encoded.len().min(8)])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl Default for Address {
    fn default() -> Self {
        Address([0u8; ADDRESS_SIZE])
    }
}

impl std::str::FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}
