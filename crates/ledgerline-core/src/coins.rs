//! Static coin configuration.
//!
//! Coin ids are the second byte of coin and counter assets. Each coin carries
//! a display label and an optional URL template for its counters, where
//! `{ID}` is replaced by the counter id.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Placeholder substituted by the counter id in [`CoinConfig::src_url`].
pub const COUNTER_ID_PLACEHOLDER: &str = "{ID}";

/// The native coin.
pub const NATIVE_COIN: u8 = 0;

/// Coin backing media view counters.
pub const MEDIA_COIN: u8 = 1;

/// Display and lookup configuration of one coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinConfig {
    pub label: &'static str,
    pub src_url: &'static str,
}

static COINS: Lazy<BTreeMap<u8, CoinConfig>> = Lazy::new(|| {
    BTreeMap::from([
        (
            NATIVE_COIN,
            CoinConfig {
                label: "LDG",
                src_url: "",
            },
        ),
        (
            MEDIA_COIN,
            CoinConfig {
                label: "MEDIA",
                src_url: "https://media.ledgerline.org/v/{ID}",
            },
        ),
    ])
});

/// Look up a coin by id.
pub fn coin_config(coin_id: u8) -> Option<&'static CoinConfig> {
    COINS.get(&coin_id)
}
