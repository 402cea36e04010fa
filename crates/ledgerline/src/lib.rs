//! # Ledgerline
//!
//! A single-signer chain: one master key signs every block, blocks link by
//! hash and height, and each block binds an ordered batch of transactions
//! through a Merkle root. Accepted batches are executed in order against
//! ledger state.
//!
//! ## Key Concepts
//!
//! - **Genesis**: accepted once through [`Chain::bootstrap`], never through the
//!   header rule
//! - **Header rule**: linkage, master-key authorization and signature
//! - **Kinds**: transaction payloads resolved by tag through the process-wide
//!   registry
//! - **Atomic blocks**: a block's writes reach state only if every transaction
//!   executed
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ledgerline::{Chain, ChainConfig};
//! use ledgerline::core::{BlockBuilder, ChainParams, Keypair};
//! use ledgerline::objects::User;
//!
//! let master = Keypair::generate();
//! let genesis = BlockBuilder::genesis().sign(&master);
//!
//! let mut chain = Chain::in_memory(ChainConfig::new(ChainParams::from_genesis(&genesis.header)));
//! chain.bootstrap(genesis).unwrap();
//!
//! let alice = Keypair::generate();
//! let tx = User::new_tx(&alice, "alice", 0, Vec::<u8>::new(), 1, 0);
//! let block = BlockBuilder::after(chain.tip().unwrap())
//!     .transaction(tx)
//!     .sign(&master);
//! chain.append(block).unwrap();
//! ```
//!
//! ## Re-exports
//!
//! - `ledgerline::core` - Primitives (assets, envelope, headers)
//! - `ledgerline::state` - State implementations
//! - `ledgerline::objects` - Transaction kinds

pub mod chain;
pub mod config;
pub mod error;
pub mod registry;

// Re-export component crates
pub use ledgerline_core as core;
pub use ledgerline_objects as objects;
pub use ledgerline_state as state;

pub use chain::Chain;
pub use config::{ChainConfig, DEFAULT_MAX_BLOCK_TXS};
pub use error::{ChainError, Result};
pub use registry::{builtin_registry, install_registry, registry};

// Re-export commonly used core types
pub use ledgerline_core::{
    Asset, Block, BlockBuilder, BlockHeader, ChainParams, Keypair, Transaction, TxId, TxRegistry,
};
