//! In-memory implementation of the State trait.
//!
//! Entries live in an ordered map so iteration and [`MemoryState::state_hash`]
//! are deterministic across nodes.

use std::collections::BTreeMap;

use ledgerline_core::canonical::{encode_fields, Field};
use ledgerline_core::{Address, Asset, Blake3Hash, State, StateEntry, StateError};

/// Domain separation prefix for state digests.
pub const STATE_HASH_DOMAIN: &[u8] = b"ledgerline/state/v1";

/// Key of a state entry.
pub type StateKey = (Asset, Address);

/// Ordered in-memory ledger state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryState {
    entries: BTreeMap<StateKey, StateEntry>,
}

impl MemoryState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &StateEntry)> {
        self.entries.iter()
    }

    /// Entries of one asset, ordered by address.
    pub fn holders<'a>(&'a self, asset: &'a Asset) -> impl Iterator<Item = (&'a Address, &'a StateEntry)> {
        self.entries
            .iter()
            .filter(move |((a, _), _)| a == asset)
            .map(|((_, address), entry)| (address, entry))
    }

    /// Digest over every entry in key order.
    ///
    /// Two states hash equal iff they hold the same entries.
    pub fn state_hash(&self) -> Blake3Hash {
        let rows: Vec<Field> = self
            .entries
            .iter()
            .map(|((asset, address), entry)| {
                Field::List(vec![
                    Field::bytes(asset.as_bytes()),
                    Field::bytes(address.as_bytes()),
                    Field::bytes(entry.value.to_be_bytes()),
                    Field::uint(entry.memo),
                ])
            })
            .collect();
        Blake3Hash::hash_with_domain(STATE_HASH_DOMAIN, &encode_fields(&rows))
    }

    pub(crate) fn insert(&mut self, key: StateKey, entry: StateEntry) {
        self.entries.insert(key, entry);
    }
}

impl State for MemoryState {
    fn get_entry(&self, asset: &Asset, address: &Address) -> Result<Option<StateEntry>, StateError> {
        Ok(self.entries.get(&(asset.clone(), *address)).copied())
    }

    fn set(
        &mut self,
        asset: &Asset,
        address: &Address,
        value: i128,
        memo: u64,
    ) -> Result<(), StateError> {
        self.insert((asset.clone(), *address), StateEntry { value, memo });
        Ok(())
    }

    fn remove(&mut self, asset: &Asset, address: &Address) -> Result<(), StateError> {
        self.entries.remove(&(asset.clone(), *address));
        Ok(())
    }
}
