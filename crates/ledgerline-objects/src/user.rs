//! User registration.
//!
//! Claims a nickname for the sender: executing the transaction records the
//! name asset under the sender's address with value 1. Double claims are not
//! checked here; the state store's write semantics decide.
//!
//! ## Payload
//!
//! `[nick, referrer, data]` where `referrer` is a user id (u64) and `data` is
//! an opaque blob of at most [`USER_DATA_SIZE_LIMIT`] bytes.

use std::any::Any;
use std::fmt;

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use ledgerline_core::canonical::{decode_fields, encode_fields, Field};
use ledgerline_core::types::hex_u64;
use ledgerline_core::{
    Asset, CodecError, Keypair, State, StateError, Transaction, TxError, TxObject, TxType,
};

use crate::error::UserError;

/// Type tag of user registrations.
pub const TX_USER: TxType = 0x01;

/// Maximum size of the data blob.
pub const USER_DATA_SIZE_LIMIT: usize = 1000;

static NICKNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9\-]{2,20}$").expect("nickname pattern is valid"));

/// Payload of a user registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub nick: String,

    #[serde(rename = "referrer", with = "hex_u64")]
    pub referrer_id: u64,

    #[serde(with = "hex_bytes")]
    pub data: Bytes,
}

impl User {
    pub fn new(nick: impl Into<String>, referrer_id: u64, data: impl Into<Bytes>) -> Self {
        Self {
            nick: nick.into(),
            referrer_id,
            data: data.into(),
        }
    }

    /// Factory used by the registry.
    pub fn boxed() -> Box<dyn TxObject> {
        Box::<Self>::default()
    }

    /// Build a signed registration transaction.
    pub fn new_tx(
        keypair: &Keypair,
        nick: impl Into<String>,
        referrer_id: u64,
        data: impl Into<Bytes>,
        nonce: u64,
        timestamp: i64,
    ) -> Transaction {
        let user = Self::new(nick, referrer_id, data);
        Transaction::new(keypair, Box::new(user), nonce, timestamp)
    }

    /// Check the nickname pattern and the data size.
    pub fn validate(&self) -> Result<(), UserError> {
        if !NICKNAME_PATTERN.is_match(&self.nick) {
            return Err(UserError::InvalidNickname);
        }
        if self.data.len() > USER_DATA_SIZE_LIMIT {
            return Err(UserError::DataTooLong {
                len: self.data.len(),
                max: USER_DATA_SIZE_LIMIT,
            });
        }
        Ok(())
    }

    /// The asset claimed by this registration.
    pub fn name_asset(&self) -> Asset {
        Asset::name(&self.nick)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nick)
    }
}

impl TxObject for User {
    fn tx_type(&self) -> TxType {
        TX_USER
    }

    fn kind_name(&self) -> &'static str {
        "User"
    }

    fn encode(&self) -> Vec<u8> {
        encode_fields(&[
            Field::text(self.nick.as_str()),
            Field::uint(self.referrer_id),
            Field::bytes(&self.data),
        ])
    }

    fn decode(&mut self, data: &[u8]) -> Result<(), CodecError> {
        let mut fields = decode_fields(data)?.expect_len(3)?;
        self.nick = fields.next_text()?;
        self.referrer_id = fields.next_u64()?;
        self.data = Bytes::from(fields.next_bytes()?);
        Ok(())
    }

    fn verify(&self, _tx: &Transaction) -> Result<(), TxError> {
        self.validate().map_err(|e| TxError::rejected("user", e))
    }

    fn execute(&self, tx: &Transaction, state: &mut dyn State) -> Result<(), StateError> {
        state.set(&self.name_asset(), &tx.sender_address(), 1, 0)
    }

    fn clone_object(&self) -> Box<dyn TxObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Blob fields travel through JSON as lowercase hex.
mod hex_bytes {
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s)
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
