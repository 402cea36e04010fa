//! # Ledgerline State
//!
//! Implementations of the [`State`](ledgerline_core::State) contract.
//!
//! ## Key Types
//!
//! - [`MemoryState`] - Ordered in-memory state with a deterministic digest
//! - [`StagedState`] - Write overlay committed atomically per block
//!
//! ## Design Notes
//!
//! - **Read-your-writes**: writes made while executing a block are visible to
//!   later transactions of the same block through the overlay
//! - **All or nothing**: a block's writes reach the base state only on commit

pub mod memory;
pub mod staged;

pub use memory::{MemoryState, StateKey, STATE_HASH_DOMAIN};
pub use staged::StagedState;
