//! Transaction kind registry.
//!
//! Maps a one-byte type tag to a factory producing an empty instance of that
//! kind, plus the kind's canonical lowercase name. The envelope decoder uses
//! the registry to materialize the right concrete kind before populating it
//! from bytes. A tag can be registered once; a collision means two kinds were
//! built with the same tag.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{RegistryError, TxError};
use crate::transaction::TxObject;
use crate::types::TxType;

/// Name reported for tags that were never registered.
pub const UNKNOWN_TX_NAME: &str = "unknown_tx";

/// Produces a zero-valued instance of a transaction kind.
pub type TxFactory = fn() -> Box<dyn TxObject>;

struct Entry {
    name: String,
    factory: TxFactory,
}

/// Table of registered transaction kinds.
#[derive(Default)]
pub struct TxRegistry {
    entries: BTreeMap<TxType, Entry>,
}

impl TxRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the kind produced by `factory` under `tag`.
    ///
    /// Fails if the tag is taken, or if the factory's instance reports a
    /// different tag than the one it is registered under.
    pub fn register(&mut self, tag: TxType, factory: TxFactory) -> Result<&mut Self, RegistryError> {
        if self.entries.contains_key(&tag) {
            return Err(RegistryError::AlreadyRegistered(tag));
        }

        let zero = factory();
        if zero.tx_type() != tag {
            return Err(RegistryError::TagMismatch {
                tag,
                actual: zero.tx_type(),
            });
        }

        self.entries.insert(
            tag,
            Entry {
                name: zero.kind_name().to_lowercase(),
                factory,
            },
        );
        Ok(self)
    }

    /// Registered kind name, or `"unknown_tx"`. Never fails.
    pub fn type_name(&self, tag: TxType) -> &str {
        self.entries
            .get(&tag)
            .map_or(UNKNOWN_TX_NAME, |e| e.name.as_str())
    }

    /// A fresh, zero-valued instance of the kind registered under `tag`.
    pub fn new_by_type(&self, tag: TxType) -> Result<Box<dyn TxObject>, TxError> {
        self.entries
            .get(&tag)
            .map(|e| (e.factory)())
            .ok_or(TxError::UnsupportedType(tag))
    }

    pub fn contains(&self, tag: TxType) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Registered tags, ascending.
    pub fn tags(&self) -> impl Iterator<Item = TxType> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TxRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(tag, e)| (tag, &e.name)))
            .finish()
    }
}
