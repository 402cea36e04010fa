//! Chain configuration.

use serde::{Deserialize, Serialize};

use ledgerline_core::ChainParams;

use crate::error::{ChainError, Result};

/// Default upper bound on transactions per block.
pub const DEFAULT_MAX_BLOCK_TXS: usize = 10_000;

/// Configuration for a [`Chain`](crate::Chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Master key and genesis hash.
    pub params: ChainParams,

    /// Blocks carrying more transactions are rejected.
    #[serde(default = "default_max_block_txs")]
    pub max_block_txs: usize,
}

fn default_max_block_txs() -> usize {
    DEFAULT_MAX_BLOCK_TXS
}

impl ChainConfig {
    pub fn new(params: ChainParams) -> Self {
        Self {
            params,
            max_block_txs: DEFAULT_MAX_BLOCK_TXS,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ChainError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_block_txs == 0 {
            return Err(ChainError::Config("max_block_txs must be positive".into()));
        }
        if self.params.master_key.is_empty() {
            return Err(ChainError::Config("master_key is empty".into()));
        }
        Ok(())
    }
}
