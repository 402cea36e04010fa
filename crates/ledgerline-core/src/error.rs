//! Error types for Ledgerline Core.
//!
//! Every failure reason is a distinct variant so that callers can tell
//! exactly which invariant broke.

use thiserror::Error;

use crate::crypto::Blake3Hash;
use crate::types::TxType;

/// Errors from the cryptographic identity layer.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Errors from decoding canonical bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("bytes are not in canonical form")]
    NonCanonical,

    #[error("expected a field list")]
    NotAList,

    #[error("expected {expected} fields, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("field {index}: expected {expected}")]
    FieldType { index: usize, expected: &'static str },

    #[error("field {index}: integer out of range")]
    OutOfRange { index: usize },

    #[error("unsupported value: {0}")]
    Unsupported(&'static str),
}

/// Errors from asset parsing and asset accessors.
#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    #[error("invalid asset hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("asset is empty")]
    Empty,

    #[error("asset is not a counter (type {0})")]
    NotCounter(u8),

    #[error("asset is too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("unknown coin: {0}")]
    UnknownCoin(u8),

    #[error("counter id is not valid UTF-8")]
    NonUtf8CounterId,
}

/// Errors from transaction decoding, identification and verification.
#[derive(Debug, Error)]
pub enum TxError {
    #[error("unsupported transaction-type: {0}")]
    UnsupportedType(TxType),

    #[error("invalid tx data: {0}")]
    InvalidData(#[from] CodecError),

    #[error("unsupported transaction version: {0}")]
    UnsupportedVersion(u8),

    #[error("empty sender key")]
    EmptySender,

    #[error("invalid transaction signature")]
    InvalidSignature,

    #[error("unknown txID format: {0:?}")]
    UnknownTxIdFormat(String),

    #[error("invalid user ID: {0:?}")]
    InvalidUserId(String),

    /// A kind-specific rule rejected the transaction.
    #[error("tx-{kind}-verify: {source}")]
    Rejected {
        kind: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TxError {
    /// Wrap a kind-specific validation error.
    pub fn rejected<E>(kind: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TxError::Rejected {
            kind,
            source: Box::new(err),
        }
    }

    /// Downcast a kind-specific rejection to its concrete error type.
    pub fn rejection<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            TxError::Rejected { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Errors from the transaction registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("transaction type {0} has been registered")]
    AlreadyRegistered(TxType),

    #[error("factory for tag {tag} produced a transaction of type {actual}")]
    TagMismatch { tag: TxType, actual: TxType },

    #[error("transaction registry is already installed")]
    AlreadyInstalled,
}

/// Block validation errors.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("invalid genesis block")]
    InvalidGenesisBlock,

    #[error("genesis hash mismatch: expected {expected:?}, got {got:?}")]
    GenesisMismatch { expected: Blake3Hash, got: Blake3Hash },

    #[error("invalid block height: expected {expected}, got {got}")]
    InvalidHeight { expected: u64, got: u64 },

    #[error("invalid previous block hash")]
    InvalidPrevHash,

    #[error("empty miner key")]
    EmptyMinerKey,

    #[error("invalid miner key")]
    InvalidMinerKey,

    #[error("invalid block signature")]
    InvalidSignature,

    #[error("merkle root does not match transactions")]
    InvalidMerkleRoot,

    #[error("invalid transaction at index {index}: {source}")]
    InvalidTransaction {
        index: usize,
        #[source]
        source: TxError,
    },

    #[error("too many transactions: {count} (max {max})")]
    TooManyTransactions { count: usize, max: usize },

    #[error("invalid block data: {0}")]
    Malformed(#[from] CodecError),
}

/// Errors reported by a ledger state backend.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state backend error: {0}")]
    Backend(String),
}
