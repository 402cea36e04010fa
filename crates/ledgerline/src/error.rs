//! Error types for chain operations.

use ledgerline_core::{BlockError, RegistryError, StateError};
use thiserror::Error;

/// Errors that can occur while building or extending a chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The block failed decoding or verification.
    #[error("block rejected: {0}")]
    Block(#[from] BlockError),

    /// The state backend failed during execution.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Registry setup failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// No genesis block has been accepted yet.
    #[error("chain is not bootstrapped")]
    NotBootstrapped,

    /// A genesis block has already been accepted.
    #[error("chain is already bootstrapped")]
    AlreadyBootstrapped,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
