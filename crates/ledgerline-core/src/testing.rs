//! Minimal transaction kinds and state used by unit tests.

use std::any::Any;
use std::collections::BTreeMap;

use crate::asset::Asset;
use crate::canonical::{decode_fields, encode_fields, Field};
use crate::error::{CodecError, StateError, TxError};
use crate::registry::TxRegistry;
use crate::state::{State, StateEntry};
use crate::transaction::{Transaction, TxObject};
use crate::types::{Address, TxType};

pub const MEMO_TX: TxType = 0x10;

#[derive(Debug, thiserror::Error)]
#[error("memo text is empty")]
pub struct EmptyMemo;

/// Counts how many times each memo text was posted by a sender.
#[derive(Debug, Clone, Default)]
pub struct Memo {
    pub text: String,
}

impl Memo {
    pub fn new(text: &str) -> Box<dyn TxObject> {
        Box::new(Self {
            text: text.to_string(),
        })
    }

    pub fn boxed() -> Box<dyn TxObject> {
        Box::<Self>::default()
    }
}

impl TxObject for Memo {
    fn tx_type(&self) -> TxType {
        MEMO_TX
    }

    fn kind_name(&self) -> &'static str {
        "Memo"
    }

    fn encode(&self) -> Vec<u8> {
        encode_fields(&[Field::text(self.text.as_str())])
    }

    fn decode(&mut self, data: &[u8]) -> Result<(), CodecError> {
        let mut fields = decode_fields(data)?.expect_len(1)?;
        self.text = fields.next_text()?;
        Ok(())
    }

    fn verify(&self, _tx: &Transaction) -> Result<(), TxError> {
        if self.text.is_empty() {
            return Err(TxError::rejected("memo", EmptyMemo));
        }
        Ok(())
    }

    fn execute(&self, tx: &Transaction, state: &mut dyn State) -> Result<(), StateError> {
        let asset = Asset::counter(0, self.text.as_bytes());
        let address = tx.sender_address();
        let count = state.get(&asset, &address)?;
        state.set(&asset, &address, count + 1, 0)
    }

    fn clone_object(&self) -> Box<dyn TxObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A second kind with an empty payload.
#[derive(Debug, Clone, Default)]
pub struct OtherMemo;

impl OtherMemo {
    pub const TAG: TxType = MEMO_TX + 2;

    pub fn boxed() -> Box<dyn TxObject> {
        Box::new(Self)
    }
}

impl TxObject for OtherMemo {
    fn tx_type(&self) -> TxType {
        Self::TAG
    }

    fn kind_name(&self) -> &'static str {
        "OtherMemo"
    }

    fn encode(&self) -> Vec<u8> {
        encode_fields(&[])
    }

    fn decode(&mut self, data: &[u8]) -> Result<(), CodecError> {
        decode_fields(data)?.expect_len(0)?;
        Ok(())
    }

    fn verify(&self, _tx: &Transaction) -> Result<(), TxError> {
        Ok(())
    }

    fn execute(&self, _tx: &Transaction, _state: &mut dyn State) -> Result<(), StateError> {
        Ok(())
    }

    fn clone_object(&self) -> Box<dyn TxObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn memo_registry() -> TxRegistry {
    let mut registry = TxRegistry::new();
    registry
        .register(MEMO_TX, Memo::boxed)
        .expect("memo tag is free");
    registry
}

/// Plain map-backed state.
#[derive(Debug, Default)]
pub struct MemoryTestState {
    pub entries: BTreeMap<(Asset, Address), StateEntry>,
}

impl State for MemoryTestState {
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
        self.entries
            .insert((asset.clone(), *address), StateEntry { value, memo });
        Ok(())
    }

    fn remove(&mut self, asset: &Asset, address: &Address) -> Result<(), StateError> {
        self.entries.remove(&(asset.clone(), *address));
        Ok(())
    }
}
