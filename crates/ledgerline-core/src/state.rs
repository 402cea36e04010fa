//! Ledger state contract.
//!
//! The state store is keyed by `(asset, address)` and holds a signed value
//! plus an opaque memo. Transactions mutate state only through this trait;
//! writes made while executing a block must be visible to later reads in the
//! same block.

use crate::asset::Asset;
use crate::error::StateError;
use crate::types::Address;

/// A value stored under an `(asset, address)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateEntry {
    pub value: i128,
    pub memo: u64,
}

/// One change in a batch: `Some` writes the entry, `None` removes the key.
pub type StateWrite = (Asset, Address, Option<StateEntry>);

/// Read/write access to ledger state.
pub trait State {
    /// Read the entry at `(asset, address)`, if any.
    fn get_entry(&self, asset: &Asset, address: &Address) -> Result<Option<StateEntry>, StateError>;

    /// Write `value` (with `memo`) at `(asset, address)`.
    fn set(
        &mut self,
        asset: &Asset,
        address: &Address,
        value: i128,
        memo: u64,
    ) -> Result<(), StateError>;

    /// Remove the entry at `(asset, address)`. Removing an absent key is not an error.
    fn remove(&mut self, asset: &Asset, address: &Address) -> Result<(), StateError>;

    /// Apply a batch of changes, all or nothing.
    ///
    /// The default applies changes in order. If one fails, every change
    /// already made is undone in reverse order before the error is returned.
    /// Backends with native transactions should override this.
    fn apply(&mut self, batch: &[StateWrite]) -> Result<(), StateError> {
        let mut undo: Vec<StateWrite> = Vec::with_capacity(batch.len());
        for (asset, address, entry) in batch {
            let written = match self.get_entry(asset, address) {
                Ok(prior) => put(self, asset, address, *entry).map(|()| prior),
                Err(e) => Err(e),
            };
            match written {
                Ok(prior) => undo.push((asset.clone(), *address, prior)),
                Err(e) => {
                    for (asset, address, prior) in undo.iter().rev() {
                        put(self, asset, address, *prior)?;
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Read the value at `(asset, address)`; absent entries read as zero.
    fn get(&self, asset: &Asset, address: &Address) -> Result<i128, StateError> {
        Ok(self.get_entry(asset, address)?.map_or(0, |e| e.value))
    }
}

fn put<S: State + ?Sized>(
    state: &mut S,
    asset: &Asset,
    address: &Address,
    entry: Option<StateEntry>,
) -> Result<(), StateError> {
    match entry {
        Some(StateEntry { value, memo }) => state.set(asset, address, value, memo),
        None => state.remove(asset, address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519PublicKey;
    use crate::testing::MemoryTestState;

    fn addr(b: u8) -> Address {
        Address::from_public_key(&Ed25519PublicKey::from_bytes([b; 32]))
    }

    /// Refuses writes to one asset.
    #[derive(Default)]
    struct Refusing {
        inner: MemoryTestState,
        refused: Option<Asset>,
    }

    impl State for Refusing {
        fn get_entry(&self, asset: &Asset, address: &Address) -> Result<Option<StateEntry>, StateError> {
            self.inner.get_entry(asset, address)
        }

        fn set(&mut self, asset: &Asset, address: &Address, value: i128, memo: u64) -> Result<(), StateError> {
            if self.refused.as_ref() == Some(asset) {
                return Err(StateError::Backend("refused".into()));
            }
            self.inner.set(asset, address, value, memo)
        }

        fn remove(&mut self, asset: &Asset, address: &Address) -> Result<(), StateError> {
            self.inner.remove(asset, address)
        }
    }

    fn write(asset: Asset, who: u8, value: i128) -> StateWrite {
        (asset, addr(who), Some(StateEntry { value, memo: 0 }))
    }

    #[test]
    fn test_apply_writes_and_removes() {
        let mut state = MemoryTestState::default();
        state.set(&Asset::coin(1), &addr(1), 7, 0).unwrap();

        state
            .apply(&[
                write(Asset::coin(0), 1, 5),
                (Asset::coin(1), addr(1), None),
            ])
            .unwrap();

        assert_eq!(state.get(&Asset::coin(0), &addr(1)).unwrap(), 5);
        assert_eq!(state.get_entry(&Asset::coin(1), &addr(1)).unwrap(), None);
    }

    #[test]
    fn test_apply_failure_restores_prior_entries() {
        let mut state = Refusing {
            refused: Some(Asset::name("bob")),
            ..Default::default()
        };
        state.set(&Asset::coin(0), &addr(1), 3, 9).unwrap();
        let before = state.inner.entries.clone();

        let err = state
            .apply(&[
                write(Asset::coin(0), 1, 4),
                write(Asset::name("alice"), 1, 1),
                write(Asset::name("bob"), 1, 1),
            ])
            .unwrap_err();

        assert!(matches!(err, StateError::Backend(_)));
        assert_eq!(state.inner.entries, before);
    }

    #[test]
    fn test_apply_same_key_twice_undone() {
        let mut state = Refusing {
            refused: Some(Asset::name("bob")),
            ..Default::default()
        };
        state
            .apply(&[
                write(Asset::coin(0), 1, 1),
                write(Asset::coin(0), 1, 2),
                write(Asset::name("bob"), 2, 1),
            ])
            .unwrap_err();

        assert!(state.inner.entries.is_empty());
    }
}
