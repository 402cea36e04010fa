//! Block headers and blocks.
//!
//! A header links to its predecessor by hash, binds its batch through a
//! Merkle root and carries the miner's signature over its own hash. The hash
//! covers the seven content fields only, never the signature.
//!
//! ## Wire form
//!
//! - header: `[version, height, timestamp, prev_hash|null, merkle_root, nonce, miner, signature]`
//! - block: `[header_bytes, [tx_bytes, ...]]`

use crate::canonical::{decode_fields, encode_fields, Field};
use crate::crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair};
use crate::error::{BlockError, CodecError};
use crate::merkle::merkle_root;
use crate::params::ChainParams;
use crate::registry::TxRegistry;
use crate::transaction::Transaction;
use crate::types::TxId;
use crate::validation;

/// The current header version.
pub const BLOCK_VERSION: u32 = 0;

/// Domain separation prefix for header hashes.
pub const BLOCK_HEADER_DOMAIN: &[u8] = b"ledgerline/block-header/v1";

const HEADER_FIELDS: usize = 8;
const BLOCK_FIELDS: usize = 2;

/// The unit of chain linkage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,

    /// 0 for genesis, then strictly +1 per block.
    pub height: u64,

    /// Unix microseconds.
    pub timestamp: i64,

    /// Hash of the previous header. `None` only for genesis.
    pub prev_hash: Option<Blake3Hash>,

    /// Merkle root over the block's transaction hashes.
    pub merkle_root: Blake3Hash,

    /// Reserved. Not a proof-of-work nonce.
    pub nonce: u64,

    /// Identity of the block producer.
    pub miner: Ed25519PublicKey,

    /// Miner signature over [`BlockHeader::hash`].
    pub signature: Ed25519Signature,
}

impl BlockHeader {
    fn hashed_fields(&self) -> Vec<Field> {
        vec![
            Field::uint(self.version),
            Field::uint(self.height),
            Field::int(self.timestamp),
            Field::optional_bytes(self.prev_hash.as_ref()),
            Field::bytes(self.merkle_root.as_bytes()),
            Field::uint(self.nonce),
            Field::bytes(self.miner.as_bytes()),
        ]
    }

    /// Hash over the seven content fields. The signature is excluded.
    pub fn hash(&self) -> Blake3Hash {
        Blake3Hash::hash_with_domain(BLOCK_HEADER_DOMAIN, &encode_fields(&self.hashed_fields()))
    }

    /// Numeric form of the header hash, same derivation as transaction ids.
    pub fn id(&self) -> TxId {
        TxId::from_hash(&self.hash())
    }

    /// Sign the header hash, setting `miner` to the signer.
    pub fn sign(&mut self, keypair: &Keypair) {
        self.miner = keypair.public_key();
        self.signature = keypair.sign(self.hash().as_bytes());
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Verify this header as the successor of `prev`.
    ///
    /// A height-0 header hashing to the configured genesis hash is always
    /// rejected here; genesis is admitted only through the bootstrap path.
    pub fn verify(&self, prev: Option<&BlockHeader>, params: &ChainParams) -> Result<(), BlockError> {
        validation::verify_header(self, prev, params)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut fields = self.hashed_fields();
        fields.push(Field::bytes(self.signature.as_bytes()));
        encode_fields(&fields)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut fields = decode_fields(bytes)?.expect_len(HEADER_FIELDS)?;
        Ok(Self {
            version: fields.next_u32()?,
            height: fields.next_u64()?,
            timestamp: fields.next_i64()?,
            prev_hash: fields.next_optional_array::<32>()?.map(Blake3Hash::from_bytes),
            merkle_root: Blake3Hash::from_bytes(fields.next_array::<32>()?),
            nonce: fields.next_u64()?,
            miner: Ed25519PublicKey::from_bytes(fields.next_array::<32>()?),
            signature: Ed25519Signature::from_bytes(fields.next_array::<64>()?),
        })
    }
}

/// A header plus its ordered batch of transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub txs: Vec<Transaction>,
}

impl Block {
    pub fn hash(&self) -> Blake3Hash {
        self.header.hash()
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    /// Transaction hashes in batch order.
    pub fn tx_hashes(&self) -> Vec<Blake3Hash> {
        self.txs.iter().map(Transaction::hash).collect()
    }

    /// Merkle root recomputed from the transactions.
    pub fn compute_merkle_root(&self) -> Blake3Hash {
        merkle_root(&self.tx_hashes())
    }

    /// Header rule, Merkle binding, then every transaction.
    pub fn verify(&self, prev: Option<&BlockHeader>, params: &ChainParams) -> Result<(), BlockError> {
        validation::verify_block(self, prev, params)
    }

    pub fn encode(&self) -> Vec<u8> {
        let txs = self.txs.iter().map(|tx| Field::Bytes(tx.encode())).collect();
        encode_fields(&[Field::Bytes(self.header.encode()), Field::List(txs)])
    }

    /// Decode a block, resolving transaction kinds through `registry`.
    pub fn decode_with(registry: &TxRegistry, bytes: &[u8]) -> Result<Self, BlockError> {
        let mut fields = decode_fields(bytes)?.expect_len(BLOCK_FIELDS)?;
        let header = BlockHeader::decode(&fields.next_bytes()?)?;

        let txs = fields
            .next_list()?
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Field::Bytes(raw) => Transaction::decode_with(registry, &raw)
                    .map_err(|source| BlockError::InvalidTransaction { index, source }),
                _ => Err(BlockError::Malformed(CodecError::FieldType {
                    index,
                    expected: "bytes",
                })),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { header, txs })
    }
}

/// Builder for signed blocks.
pub struct BlockBuilder {
    version: u32,
    height: u64,
    timestamp: i64,
    prev_hash: Option<Blake3Hash>,
    nonce: u64,
    txs: Vec<Transaction>,
}

impl BlockBuilder {
    /// Start a block at `height` with no predecessor link.
    pub fn new(height: u64) -> Self {
        Self {
            version: BLOCK_VERSION,
            height,
            timestamp: 0,
            prev_hash: None,
            nonce: 0,
            txs: Vec::new(),
        }
    }

    /// Start a genesis block.
    pub fn genesis() -> Self {
        Self::new(0)
    }

    /// Start the block following `prev`.
    pub fn after(prev: &BlockHeader) -> Self {
        Self::new(prev.height.saturating_add(1)).prev(prev.hash())
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn timestamp(mut self, ts: i64) -> Self {
        self.timestamp = ts;
        self
    }

    pub fn prev(mut self, prev_hash: Blake3Hash) -> Self {
        self.prev_hash = Some(prev_hash);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Append a transaction to the batch.
    pub fn transaction(mut self, tx: Transaction) -> Self {
        self.txs.push(tx);
        self
    }

    pub fn transactions(mut self, txs: impl IntoIterator<Item = Transaction>) -> Self {
        self.txs.extend(txs);
        self
    }

    /// Compute the Merkle root and sign the header.
    pub fn sign(self, keypair: &Keypair) -> Block {
        let hashes: Vec<_> = self.txs.iter().map(Transaction::hash).collect();
        let mut header = BlockHeader {
            version: self.version,
            height: self.height,
            timestamp: self.timestamp,
            prev_hash: self.prev_hash,
            merkle_root: merkle_root(&hashes),
            nonce: self.nonce,
            miner: keypair.public_key(),
            signature: Ed25519Signature::ZERO,
        };
        header.sign(keypair);
        Block {
            header,
            txs: self.txs,
        }
    }
}
