//! Test fixtures and helpers.
//!
//! Common setup code for chain tests: a master keypair that signs blocks, a
//! user keypair that signs transactions, and a deterministic genesis.

use ledgerline_core::{
    Address, Block, BlockBuilder, BlockHeader, ChainParams, Ed25519PublicKey, Keypair,
    Transaction,
};
use ledgerline_objects::User;

/// Timestamp of the fixture genesis block (Unix microseconds).
pub const GENESIS_TIMESTAMP: i64 = 1_700_000_000_000_000;

/// Spacing between fixture blocks (one second).
pub const BLOCK_INTERVAL: i64 = 1_000_000;

/// A master keypair plus one user.
pub struct TestFixture {
    pub master: Keypair,
    pub user: Keypair,
}

impl TestFixture {
    /// Create a fixture with fixed keys, so every fixture shares one genesis.
    pub fn new() -> Self {
        Self::with_seeds([0x01; 32], [0x02; 32])
    }

    /// Create with deterministic keypairs from seeds.
    pub fn with_seeds(master: [u8; 32], user: [u8; 32]) -> Self {
        Self {
            master: Keypair::from_seed(&master),
            user: Keypair::from_seed(&user),
        }
    }

    pub fn master(&self) -> &Keypair {
        &self.master
    }

    pub fn master_key(&self) -> Ed25519PublicKey {
        self.master.public_key()
    }

    /// The user's state address.
    pub fn user_address(&self) -> Address {
        Address::from_public_key(&self.user.public_key())
    }

    /// The genesis block, signed by the master.
    pub fn genesis(&self) -> Block {
        BlockBuilder::genesis()
            .timestamp(GENESIS_TIMESTAMP)
            .sign(&self.master)
    }

    /// Parameters of the chain rooted at [`TestFixture::genesis`].
    pub fn params(&self) -> ChainParams {
        ChainParams::from_genesis(&self.genesis().header)
    }

    /// A user registration signed by the fixture user.
    pub fn user_tx(&self, nick: &str, nonce: u64) -> Transaction {
        self.user_tx_with_data(nick, Vec::new(), nonce)
    }

    pub fn user_tx_with_data(&self, nick: &str, data: Vec<u8>, nonce: u64) -> Transaction {
        let timestamp = GENESIS_TIMESTAMP.saturating_add(nonce as i64);
        User::new_tx(&self.user, nick, 0, data, nonce, timestamp)
    }

    /// The signed successor of `prev` carrying `txs`.
    pub fn next_block(&self, prev: &BlockHeader, txs: Vec<Transaction>) -> Block {
        BlockBuilder::after(prev)
            .timestamp(prev.timestamp.saturating_add(BLOCK_INTERVAL))
            .transactions(txs)
            .sign(&self.master)
    }

    /// Genesis followed by `count` empty blocks.
    pub fn empty_chain(&self, count: usize) -> Vec<Block> {
        let mut blocks = vec![self.genesis()];
        for _ in 0..count {
            let prev = &blocks[blocks.len() - 1].header;
            let next = self.next_block(prev, Vec::new());
            blocks.push(next);
        }
        blocks
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinct deterministic keypairs for multi-party tests.
pub fn multi_party_keys(count: usize) -> Vec<Keypair> {
    (0..count)
        .map(|i| {
            let mut seed = [0x10u8; 32];
            seed[0] = i as u8;
            Keypair::from_seed(&seed)
        })
        .collect()
}
