//! Chain parameters consumed by header verification.

use serde::{Deserialize, Serialize};

use crate::block::BlockHeader;
use crate::crypto::{Blake3Hash, Ed25519PublicKey};

/// The fixed facts every node of a chain agrees on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    /// The only identity allowed to sign blocks.
    pub master_key: Ed25519PublicKey,

    /// Hash of the height-0 header.
    pub genesis_hash: Blake3Hash,
}

impl ChainParams {
    pub fn new(master_key: Ed25519PublicKey, genesis_hash: Blake3Hash) -> Self {
        Self {
            master_key,
            genesis_hash,
        }
    }

    /// Parameters for a chain starting at `genesis`, signed by its miner.
    pub fn from_genesis(genesis: &BlockHeader) -> Self {
        Self::new(genesis.miner, genesis.hash())
    }
}
