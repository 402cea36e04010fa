//! Staging overlay for per-block atomic execution.
//!
//! Writes land in the overlay and are visible to later reads through it.
//! Nothing reaches the base state until [`StagedState::commit`], which hands
//! the whole batch to [`State::apply`]; dropping the overlay discards every
//! staged write.

use std::collections::BTreeMap;

use ledgerline_core::{Address, Asset, State, StateEntry, StateError, StateWrite};

use crate::memory::StateKey;

/// A write buffer over a base state.
#[derive(Debug)]
pub struct StagedState<'a, S: State> {
    base: &'a mut S,
    // `None` marks a removed key.
    writes: BTreeMap<StateKey, Option<StateEntry>>,
}

impl<'a, S: State> StagedState<'a, S> {
    pub fn new(base: &'a mut S) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Number of keys written so far.
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Apply every staged change to the base as one batch, in key order.
    ///
    /// Either every change lands or the base is left as it was. Returns the
    /// number of keys changed.
    pub fn commit(self) -> Result<usize, StateError> {
        let batch: Vec<StateWrite> = self
            .writes
            .into_iter()
            .map(|((asset, address), entry)| (asset, address, entry))
            .collect();
        self.base.apply(&batch)?;
        tracing::debug!(entries = batch.len(), "committed staged state");
        Ok(batch.len())
    }

    /// Drop every staged write.
    pub fn discard(self) {
        tracing::debug!(entries = self.writes.len(), "discarded staged state");
    }
}

impl<S: State> State for StagedState<'_, S> {
    fn get_entry(&self, asset: &Asset, address: &Address) -> Result<Option<StateEntry>, StateError> {
        match self.writes.get(&(asset.clone(), *address)) {
            Some(staged) => Ok(*staged),
            None => self.base.get_entry(asset, address),
        }
    }

    fn set(
        &mut self,
        asset: &Asset,
        address: &Address,
        value: i128,
        memo: u64,
    ) -> Result<(), StateError> {
        self.writes
            .insert((asset.clone(), *address), Some(StateEntry { value, memo }));
        Ok(())
    }

    fn remove(&mut self, asset: &Asset, address: &Address) -> Result<(), StateError> {
        self.writes.insert((asset.clone(), *address), None);
        Ok(())
    }
}
