//! # Ledgerline Core
//!
//! Pure primitives for a single-signer ledger: canonical encoding, assets,
//! the transaction envelope and kind registry, block headers and their
//! verification rule.
//!
//! This crate contains no I/O, no storage, no networking. State is consumed
//! through the [`State`] trait only.
//!
//! ## Key Types
//!
//! - [`Asset`] - Typed identifier for coins, counters and names
//! - [`Transaction`] - Signed envelope around a [`TxObject`] kind
//! - [`TxRegistry`] - Tag to kind factory table used by decoding
//! - [`BlockHeader`] / [`Block`] - Chain linkage and batch binding
//! - [`ChainParams`] - Master key and genesis hash
//!
//! ## Canonicalization
//!
//! Every hashed or signed value is encoded as deterministic CBOR. See the
//! [`canonical`] module.

pub mod asset;
pub mod block;
pub mod canonical;
pub mod coins;
pub mod crypto;
pub mod error;
pub mod merkle;
pub mod params;
pub mod registry;
pub mod state;
pub mod transaction;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

pub use asset::{Asset, AssetType};
pub use block::{Block, BlockBuilder, BlockHeader, BLOCK_VERSION};
pub use coins::{coin_config, CoinConfig};
pub use crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{AssetError, BlockError, CodecError, CoreError, RegistryError, StateError, TxError};
pub use merkle::merkle_root;
pub use params::ChainParams;
pub use registry::{TxFactory, TxRegistry, UNKNOWN_TX_NAME};
pub use state::{State, StateEntry, StateWrite};
pub use transaction::{Transaction, TxHeader, TxObject, TX_VERSION};
pub use types::{parse_user_id, Address, TxId, TxType};
pub use validation::{verify_block, verify_block_body, verify_header};
