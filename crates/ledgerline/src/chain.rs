//! The Chain: accepted headers plus the ledger state they produced.
//!
//! Genesis enters through [`Chain::bootstrap`], which checks the block against
//! the configured genesis hash and never runs the header rule (that rule
//! rejects genesis as a replay). Every later block goes through
//! [`Chain::append`]: header rule against the tip, Merkle binding, transaction
//! verification, then execution in batch order. No transaction executes
//! without passing verification. A block's writes are staged
//! and committed only if every transaction executed.

use std::sync::Arc;

use ledgerline_core::{
    verify_block_body, verify_header, Blake3Hash, Block, BlockError, BlockHeader, State, TxRegistry,
};
use ledgerline_state::{MemoryState, StagedState};

use crate::config::ChainConfig;
use crate::error::{ChainError, Result};
use crate::registry::registry;

/// A single-signer chain over a state backend.
pub struct Chain<S: State = MemoryState> {
    config: ChainConfig,
    registry: Arc<TxRegistry>,
    headers: Vec<BlockHeader>,
    state: S,
}

impl Chain<MemoryState> {
    /// A chain over fresh in-memory state using the process-wide registry.
    pub fn in_memory(config: ChainConfig) -> Self {
        Self::new(config, MemoryState::new())
    }
}

impl<S: State> Chain<S> {
    /// Create a chain using the process-wide registry.
    pub fn new(config: ChainConfig, state: S) -> Self {
        Self::with_registry(config, state, registry())
    }

    /// Create a chain with an explicit registry.
    pub fn with_registry(config: ChainConfig, state: S, registry: Arc<TxRegistry>) -> Self {
        Self {
            config,
            registry,
            headers: Vec::new(),
            state,
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn registry(&self) -> &TxRegistry {
        &self.registry
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// The last accepted header.
    pub fn tip(&self) -> Option<&BlockHeader> {
        self.headers.last()
    }

    /// Height of the tip.
    pub fn height(&self) -> Option<u64> {
        self.tip().map(|h| h.height)
    }

    /// The accepted header at `height`.
    pub fn header(&self, height: u64) -> Option<&BlockHeader> {
        usize::try_from(height).ok().and_then(|i| self.headers.get(i))
    }

    pub fn is_bootstrapped(&self) -> bool {
        !self.headers.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Extension
    // ─────────────────────────────────────────────────────────────────────────

    /// Accept the genesis block.
    pub fn bootstrap(&mut self, genesis: Block) -> Result<Blake3Hash> {
        if self.is_bootstrapped() {
            return Err(ChainError::AlreadyBootstrapped);
        }

        let hash = genesis.hash();
        if let Err(e) = self.check_genesis(&genesis, hash) {
            tracing::warn!(height = genesis.height(), hash = %hash, reason = %e, "genesis rejected");
            return Err(e.into());
        }

        self.execute_and_link(genesis, hash)?;
        tracing::info!(hash = %hash, "chain bootstrapped");
        Ok(hash)
    }

    /// Verify `block` against the tip, execute it and make it the new tip.
    pub fn append(&mut self, block: Block) -> Result<Blake3Hash> {
        let tip = self.tip().ok_or(ChainError::NotBootstrapped)?;

        let hash = block.hash();
        let checked = verify_header(&block.header, Some(tip), &self.config.params)
            .and_then(|()| self.check_body(&block));
        if let Err(e) = checked {
            tracing::warn!(height = block.height(), hash = %hash, reason = %e, "block rejected");
            return Err(e.into());
        }

        let height = block.height();
        let txs = block.txs.len();
        self.execute_and_link(block, hash)?;
        tracing::info!(height, hash = %hash, txs, "block appended");
        Ok(hash)
    }

    /// Decode a block from canonical bytes and append it.
    pub fn ingest(&mut self, bytes: &[u8]) -> Result<Blake3Hash> {
        let block = Block::decode_with(&self.registry, bytes).map_err(|e| {
            tracing::warn!(reason = %e, "undecodable block");
            e
        })?;
        self.append(block)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Checks
    // ─────────────────────────────────────────────────────────────────────────

    fn check_genesis(&self, genesis: &Block, hash: Blake3Hash) -> std::result::Result<(), BlockError> {
        let params = &self.config.params;
        if !genesis.header.is_genesis() {
            return Err(BlockError::InvalidHeight {
                expected: 0,
                got: genesis.height(),
            });
        }
        if hash != params.genesis_hash {
            return Err(BlockError::GenesisMismatch {
                expected: params.genesis_hash,
                got: hash,
            });
        }
        if genesis.header.miner != params.master_key {
            return Err(BlockError::InvalidMinerKey);
        }
        params
            .master_key
            .verify(hash.as_bytes(), &genesis.header.signature)
            .map_err(|_| BlockError::InvalidSignature)?;
        self.check_body(genesis)
    }

    /// Size limit, then Merkle binding and transaction verification.
    fn check_body(&self, block: &Block) -> std::result::Result<(), BlockError> {
        if block.txs.len() > self.config.max_block_txs {
            return Err(BlockError::TooManyTransactions {
                count: block.txs.len(),
                max: self.config.max_block_txs,
            });
        }
        verify_block_body(block).map_err(|e| {
            if let BlockError::InvalidTransaction { index, source } = &e {
                if let Some(tx) = block.txs.get(*index) {
                    tracing::warn!(
                        index = *index,
                        tx_id = %tx.id(),
                        kind = self.registry.type_name(tx.tx_type()),
                        reason = %source,
                        "transaction rejected"
                    );
                }
            }
            e
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute every transaction in batch order, commit, then record the header.
    fn execute_and_link(&mut self, block: Block, hash: Blake3Hash) -> Result<()> {
        let mut staged = StagedState::new(&mut self.state);
        for (index, tx) in block.txs.iter().enumerate() {
            tracing::debug!(
                index,
                tx_id = %tx.id(),
                kind = self.registry.type_name(tx.tx_type()),
                "executing transaction"
            );
            if let Err(e) = tx.execute(&mut staged) {
                tracing::warn!(height = block.height(), hash = %hash, index, reason = %e, "execution failed");
                staged.discard();
                return Err(e.into());
            }
        }
        staged.commit().map_err(|e| {
            tracing::warn!(height = block.height(), hash = %hash, reason = %e, "commit failed");
            e
        })?;

        self.headers.push(block.header);
        Ok(())
    }
}
