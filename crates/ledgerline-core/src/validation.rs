//! Block validation: chain linkage, miner authorization and batch binding.
//!
//! All checks are pure functions of their inputs and may run in parallel
//! across independent blocks.

use crate::block::{Block, BlockHeader};
use crate::error::BlockError;
use crate::params::ChainParams;

/// Validate a header as the successor of `prev`.
///
/// Rules, in order:
/// 1. height 0 with the configured genesis hash is a genesis replay
/// 2. with a predecessor: height must be `prev.height + 1` and the
///    previous hash must be `prev.hash()`
/// 3. the miner must be present and equal the master key
/// 4. the signature must verify against the header hash
pub fn verify_header(
    header: &BlockHeader,
    prev: Option<&BlockHeader>,
    params: &ChainParams,
) -> Result<(), BlockError> {
    let hash = header.hash();

    // 1. Genesis is never accepted as a new block
    if header.is_genesis() && hash == params.genesis_hash {
        return Err(BlockError::InvalidGenesisBlock);
    }

    // 2. Linkage
    if let Some(prev) = prev {
        let expected = prev.height.checked_add(1).ok_or(BlockError::InvalidHeight {
            expected: u64::MAX,
            got: header.height,
        })?;
        if header.height != expected {
            return Err(BlockError::InvalidHeight {
                expected,
                got: header.height,
            });
        }
        if header.prev_hash != Some(prev.hash()) {
            return Err(BlockError::InvalidPrevHash);
        }
    }

    // 3. Single authorized signer
    if header.miner.is_empty() {
        return Err(BlockError::EmptyMinerKey);
    }
    if header.miner != params.master_key {
        return Err(BlockError::InvalidMinerKey);
    }

    // 4. Signature over the hash
    header
        .miner
        .verify(hash.as_bytes(), &header.signature)
        .map_err(|_| BlockError::InvalidSignature)
}

/// Validate that the batch matches the header's Merkle root and that every
/// transaction verifies on its own.
pub fn verify_block_body(block: &Block) -> Result<(), BlockError> {
    if block.compute_merkle_root() != block.header.merkle_root {
        return Err(BlockError::InvalidMerkleRoot);
    }

    for (index, tx) in block.txs.iter().enumerate() {
        tx.verify()
            .map_err(|source| BlockError::InvalidTransaction { index, source })?;
    }

    Ok(())
}

/// Header rule followed by body checks.
pub fn verify_block(
    block: &Block,
    prev: Option<&BlockHeader>,
    params: &ChainParams,
) -> Result<(), BlockError> {
    verify_header(&block.header, prev, params)?;
    verify_block_body(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockBuilder;
    use crate::crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair};
    use crate::error::TxError;
    use crate::testing::Memo;
    use crate::transaction::Transaction;

    struct Setup {
        master: Keypair,
        params: ChainParams,
        genesis: Block,
    }

    fn setup() -> Setup {
        let master = Keypair::from_seed(&[0x01; 32]);
        let genesis = BlockBuilder::genesis().timestamp(1_000).sign(&master);
        let params = ChainParams::from_genesis(&genesis.header);
        Setup {
            master,
            params,
            genesis,
        }
    }

    fn memo(text: &str) -> Transaction {
        Transaction::new(&Keypair::from_seed(&[0x42; 32]), Memo::new(text), 1, 1_000)
    }

    #[test]
    fn test_genesis_replay_rejected() {
        let s = setup();
        let err = s.genesis.header.verify(None, &s.params).unwrap_err();
        assert!(matches!(err, BlockError::InvalidGenesisBlock));
    }

    #[test]
    fn test_foreign_genesis_not_treated_as_replay() {
        let s = setup();
        let other = BlockBuilder::genesis().timestamp(9_999).sign(&s.master);
        assert!(other.header.verify(None, &s.params).is_ok());
    }

    #[test]
    fn test_successor_accepted() {
        let s = setup();
        let block = BlockBuilder::after(&s.genesis.header)
            .timestamp(2_000)
            .transaction(memo("hello"))
            .sign(&s.master);
        assert!(block.verify(Some(&s.genesis.header), &s.params).is_ok());
    }

    #[test]
    fn test_height_mutation() {
        let s = setup();
        let mut block = BlockBuilder::after(&s.genesis.header).sign(&s.master);
        block.header.height = 5;
        let err = block.header.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        assert!(matches!(
            err,
            BlockError::InvalidHeight {
                expected: 1,
                got: 5
            }
        ));
    }

    #[test]
    fn test_prev_hash_mutation() {
        let s = setup();
        let mut block = BlockBuilder::after(&s.genesis.header).sign(&s.master);
        block.header.prev_hash = Some(Blake3Hash::hash(b"elsewhere"));
        let err = block.header.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        assert!(matches!(err, BlockError::InvalidPrevHash));

        block.header.prev_hash = None;
        let err = block.header.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        assert!(matches!(err, BlockError::InvalidPrevHash));
    }

    #[test]
    fn test_empty_miner_key() {
        let s = setup();
        let mut block = BlockBuilder::after(&s.genesis.header).sign(&s.master);
        block.header.miner = Ed25519PublicKey::default();
        let err = block.header.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        assert!(matches!(err, BlockError::EmptyMinerKey));
    }

    #[test]
    fn test_foreign_miner_rejected() {
        let s = setup();
        let intruder = Keypair::from_seed(&[0x66; 32]);
        let block = BlockBuilder::after(&s.genesis.header).sign(&intruder);
        let err = block.header.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        assert!(matches!(err, BlockError::InvalidMinerKey));
    }

    #[test]
    fn test_signature_mutation() {
        let s = setup();
        let mut block = BlockBuilder::after(&s.genesis.header).sign(&s.master);
        let mut sig = *block.header.signature.as_bytes();
        sig[0] ^= 0x01;
        block.header.signature = Ed25519Signature::from_bytes(sig);
        let err = block.header.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        assert!(matches!(err, BlockError::InvalidSignature));
    }

    #[test]
    fn test_content_change_breaks_signature() {
        let s = setup();
        let mut block = BlockBuilder::after(&s.genesis.header).sign(&s.master);
        block.header.timestamp += 1;
        let err = block.header.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        assert!(matches!(err, BlockError::InvalidSignature));
    }

    #[test]
    fn test_merkle_root_binding() {
        let s = setup();
        let mut block = BlockBuilder::after(&s.genesis.header)
            .transaction(memo("a"))
            .sign(&s.master);
        block.txs.push(memo("b"));
        let err = block.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        assert!(matches!(err, BlockError::InvalidMerkleRoot));
    }

    #[test]
    fn test_invalid_transaction_reported_with_index() {
        let s = setup();
        let block = BlockBuilder::after(&s.genesis.header)
            .transaction(memo("ok"))
            .transaction(memo(""))
            .sign(&s.master);
        let err = block.verify(Some(&s.genesis.header), &s.params).unwrap_err();
        match err {
            BlockError::InvalidTransaction { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(source, TxError::Rejected { kind: "memo", .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_end_to_end_linkage() {
        let s = setup();
        let b1 = BlockBuilder::after(&s.genesis.header)
            .timestamp(2_000)
            .sign(&s.master);
        assert!(b1.verify(Some(&s.genesis.header), &s.params).is_ok());

        let b2 = BlockBuilder::after(&b1.header).timestamp(3_000).sign(&s.master);
        assert!(b2.verify(Some(&b1.header), &s.params).is_ok());
        // b2 does not follow genesis
        assert!(matches!(
            b2.verify(Some(&s.genesis.header), &s.params),
            Err(BlockError::InvalidHeight { .. })
        ));
    }
}
