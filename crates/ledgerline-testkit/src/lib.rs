//! # Ledgerline Testkit
//!
//! Testing utilities for Ledgerline.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a master key, a user key and a deterministic genesis
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ledgerline_testkit::generators::{UserTxParams, user_tx_from_params};
//!
//! proptest! {
//!     #[test]
//!     fn tx_id_is_deterministic(params: UserTxParams) {
//!         let t1 = user_tx_from_params(&params);
//!         let t2 = user_tx_from_params(&params);
//!         prop_assert_eq!(t1.id(), t2.id());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ledgerline_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let genesis = fixture.genesis();
//! let block = fixture.next_block(&genesis.header, vec![fixture.user_tx("alice", 1)]);
//! assert!(block.verify(Some(&genesis.header), &fixture.params()).is_ok());
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{multi_party_keys, TestFixture, BLOCK_INTERVAL, GENESIS_TIMESTAMP};
pub use generators::{user_tx_from_params, UserTxParams};
