//! Asset identifiers.
//!
//! An asset is a compact typed byte string naming what a ledger entry
//! values or tracks: `[type, coin_id, suffix...]`. Coins are `[Coin, coin_id]`,
//! counters are `[Counter, coin_id, counter_id...]` and registered names are
//! `[Name, nick...]`. Assets are immutable and used as state keys.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::coins::{coin_config, CoinConfig, COUNTER_ID_PLACEHOLDER};
use crate::error::AssetError;

/// Asset type discriminator (byte 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AssetType {
    Coin = 0,
    Counter = 1,
    Name = 2,
}

impl AssetType {
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Coin),
            1 => Some(Self::Counter),
            2 => Some(Self::Name),
            _ => None,
        }
    }
}

/// A typed asset identifier. Equality is byte-exact.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Asset(Vec<u8>);

impl Asset {
    /// The asset of a coin.
    pub fn coin(coin_id: u8) -> Self {
        Self(vec![AssetType::Coin.to_u8(), coin_id])
    }

    /// A counter scoped to a coin. The id is raw bytes, not necessarily text.
    pub fn counter(coin_id: u8, counter_id: impl AsRef<[u8]>) -> Self {
        let counter_id = counter_id.as_ref();
        let mut bytes = Vec::with_capacity(2 + counter_id.len());
        bytes.push(AssetType::Counter.to_u8());
        bytes.push(coin_id);
        bytes.extend_from_slice(counter_id);
        Self(bytes)
    }

    /// The asset claimed by registering `nick`.
    pub fn name(nick: &str) -> Self {
        let mut bytes = Vec::with_capacity(1 + nick.len());
        bytes.push(AssetType::Name.to_u8());
        bytes.extend_from_slice(nick.as_bytes());
        Self(bytes)
    }

    /// Wrap raw asset bytes as-is.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The discriminator byte, or `None` for an empty asset.
    pub fn type_byte(&self) -> Option<u8> {
        self.0.first().copied()
    }

    /// The discriminator as a known asset type.
    pub fn asset_type(&self) -> Option<AssetType> {
        self.type_byte().and_then(AssetType::from_u8)
    }

    pub fn is_coin(&self) -> bool {
        self.asset_type() == Some(AssetType::Coin)
    }

    pub fn is_counter(&self) -> bool {
        self.asset_type() == Some(AssetType::Counter)
    }

    pub fn is_name(&self) -> bool {
        self.asset_type() == Some(AssetType::Name)
    }

    /// The coin id (byte 1) of a coin or counter asset.
    pub fn coin_id(&self) -> Result<u8, AssetError> {
        self.0.get(1).copied().ok_or(AssetError::TooShort {
            len: self.0.len(),
            min: 2,
        })
    }

    /// Static configuration of this asset's coin, if any.
    pub fn coin_config(&self) -> Option<&'static CoinConfig> {
        if self.is_coin() || self.is_counter() {
            self.coin_id().ok().and_then(coin_config)
        } else {
            None
        }
    }

    /// Display label of the coin, falling back to the hex form.
    pub fn label(&self) -> String {
        match self.coin_config() {
            Some(cfg) => cfg.label.to_string(),
            None => self.to_string(),
        }
    }

    /// A new counter under the same coin as this asset.
    pub fn with_counter(&self, counter_id: impl AsRef<[u8]>) -> Result<Asset, AssetError> {
        Ok(Asset::counter(self.coin_id()?, counter_id))
    }

    /// Byte 1 of a counter asset.
    pub fn counter_type(&self) -> Result<u8, AssetError> {
        self.check_counter()?;
        self.coin_id()
    }

    /// The counter's own identifier (bytes after the coin id).
    pub fn counter_id(&self) -> Result<&[u8], AssetError> {
        self.check_counter()?;
        Ok(&self.0[2..])
    }

    /// Source URL of a counter, from its coin's URL template.
    pub fn counter_src_url(&self) -> Result<String, AssetError> {
        let coin_id = self.counter_type()?;
        let cfg = coin_config(coin_id).ok_or(AssetError::UnknownCoin(coin_id))?;
        let counter_id =
            std::str::from_utf8(self.counter_id()?).map_err(|_| AssetError::NonUtf8CounterId)?;
        Ok(cfg.src_url.replacen(COUNTER_ID_PLACEHOLDER, counter_id, 1))
    }

    fn check_counter(&self) -> Result<(), AssetError> {
        match self.type_byte() {
            None => Err(AssetError::Empty),
            Some(t) if t != AssetType::Counter.to_u8() => Err(AssetError::NotCounter(t)),
            Some(_) if self.0.len() < 2 => Err(AssetError::TooShort {
                len: self.0.len(),
                min: 2,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Binary form: the raw bytes, unmodified.
    pub fn encode(&self) -> Vec<u8> {
        self.0.clone()
    }

    /// Replace this asset's content wholesale.
    pub fn decode(&mut self, data: &[u8]) {
        self.0 = data.to_vec();
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({})", self)
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        Ok(Self(hex::decode(digits)?))
    }
}

impl AsRef<[u8]> for Asset {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Asset {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
