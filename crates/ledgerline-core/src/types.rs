//! Strong type definitions for Ledgerline.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::crypto::{Blake3Hash, Ed25519PublicKey};
use crate::error::TxError;

/// One-byte transaction kind tag.
pub type TxType = u8;

/// Accepts the 16-digit numeric form, optionally followed by 48 more digits.
static TX_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0x)?([0-9a-f]{16})(?:[0-9a-f]{48})?$").expect("tx id pattern is valid")
});

/// Numeric transaction identifier: the first 8 bytes of the transaction hash,
/// read big-endian.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TxId(pub u64);

impl TxId {
    /// Derive the numeric ID from a transaction hash.
    pub fn from_hash(hash: &Blake3Hash) -> Self {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.0[..8]);
        Self(u64::from_be_bytes(prefix))
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// 16 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.to_hex())
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for TxId {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = TX_ID_PATTERN
            .captures(s)
            .ok_or_else(|| TxError::UnknownTxIdFormat(s.to_string()))?;
        u64::from_str_radix(&caps[1], 16)
            .map(Self)
            .map_err(|_| TxError::UnknownTxIdFormat(s.to_string()))
    }
}

impl From<u64> for TxId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

/// Parse a user ID given as hex, with or without a "0x" prefix.
///
/// Only the numeric form (at most 16 hex digits) is accepted.
pub fn parse_user_id(s: &str) -> Result<u64, TxError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() || digits.len() > 16 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TxError::InvalidUserId(s.to_string()));
    }
    u64::from_str_radix(digits, 16).map_err(|_| TxError::InvalidUserId(s.to_string()))
}

/// Hex-encoded u64 for JSON payload fields.
pub mod hex_u64 {
    use super::*;

    pub fn serialize<S: Serializer>(n: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{:016x}", n))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_user_id(&s).map_err(serde::de::Error::custom)
    }
}

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address derived from a public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Derive the address owned by a public key.
    pub fn from_public_key(key: &Ed25519PublicKey) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"ledgerline-address-v1:");
        hasher.update(key.as_bytes());
        let mut arr = [0u8; ADDRESS_LEN];
        arr.copy_from_slice(&hasher.finalize().as_bytes()[..ADDRESS_LEN]);
        Self(arr)
    }

    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The zero address (sentinel).
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
