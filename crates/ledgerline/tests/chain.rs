//! End-to-end chain scenarios over the process-wide registry.

use ledgerline::core::{BlockError, State, TX_VERSION};
use ledgerline::objects::{User, TX_USER};
use ledgerline::{registry, Asset, Block, Chain, ChainConfig, ChainError, Keypair};
use ledgerline_testkit::{multi_party_keys, TestFixture, BLOCK_INTERVAL};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn bootstrapped(fx: &TestFixture) -> Chain {
    let mut chain = Chain::in_memory(ChainConfig::new(fx.params()));
    chain.bootstrap(fx.genesis()).unwrap();
    chain
}

#[test]
fn builtin_kinds_are_installed() {
    let registry = registry();
    assert!(registry.contains(TX_USER));
    assert_eq!(registry.type_name(TX_USER), "user");
}

#[test]
fn empty_blocks_extend_the_tip() {
    init_tracing();
    let fx = TestFixture::new();
    let blocks = fx.empty_chain(5);

    let mut chain = Chain::in_memory(ChainConfig::new(fx.params()));
    let mut blocks = blocks.into_iter();
    chain.bootstrap(blocks.next().unwrap()).unwrap();
    for block in blocks {
        let expected = block.hash();
        assert_eq!(chain.append(block).unwrap(), expected);
    }

    assert_eq!(chain.height(), Some(5));
    for height in 1..=5 {
        let header = chain.header(height).unwrap();
        let prev = chain.header(height - 1).unwrap();
        assert_eq!(header.prev_hash, Some(prev.hash()));
        assert_eq!(header.timestamp - prev.timestamp, BLOCK_INTERVAL);
    }
    assert!(chain.state().is_empty());
}

#[test]
fn registrations_land_in_state() {
    init_tracing();
    let fx = TestFixture::new();
    let mut chain = bootstrapped(&fx);

    let users = multi_party_keys(3);
    let txs = users
        .iter()
        .zip(["alice", "bob", "carol"])
        .enumerate()
        .map(|(i, (kp, nick))| User::new_tx(kp, nick, 0, b"profile".to_vec(), i as u64, 1_000))
        .collect::<Vec<_>>();
    let block = fx.next_block(chain.tip().unwrap(), txs);
    chain.append(block).unwrap();

    for (kp, nick) in users.iter().zip(["alice", "bob", "carol"]) {
        let address = ledgerline::core::Address::from_public_key(&kp.public_key());
        assert_eq!(chain.state().get(&Asset::name(nick), &address).unwrap(), 1);
    }
    assert_eq!(chain.state().len(), 3);
}

#[test]
fn ingest_follows_the_wire_form() {
    init_tracing();
    let fx = TestFixture::new();
    let mut chain = bootstrapped(&fx);

    let first = fx.next_block(chain.tip().unwrap(), vec![fx.user_tx("alice", 1)]);
    let second = fx.next_block(&first.header, vec![fx.user_tx("bob", 2)]);

    for block in [&first, &second] {
        let bytes = block.encode();
        let decoded = Block::decode_with(&registry(), &bytes).unwrap();
        assert_eq!(&decoded, block);
        assert_eq!(decoded.txs[0].header().version, TX_VERSION);
        chain.ingest(&bytes).unwrap();
    }

    assert_eq!(chain.tip().unwrap().hash(), second.hash());
    assert_eq!(
        chain.state().get(&Asset::name("bob"), &fx.user_address()).unwrap(),
        1
    );
}

#[test]
fn out_of_sequence_height_is_rejected() {
    init_tracing();
    let fx = TestFixture::new();
    let mut chain = bootstrapped(&fx);

    let mut block = fx.next_block(chain.tip().unwrap(), Vec::new());
    block.header.height = 5;
    block.header.sign(fx.master());

    let err = chain.append(block).unwrap_err();
    assert!(matches!(
        err,
        ChainError::Block(BlockError::InvalidHeight {
            expected: 1,
            got: 5
        })
    ));
    assert_eq!(chain.height(), Some(0));
}

#[test]
fn replayed_block_is_rejected() {
    init_tracing();
    let fx = TestFixture::new();
    let mut chain = bootstrapped(&fx);

    let block = fx.next_block(chain.tip().unwrap(), vec![fx.user_tx("alice", 1)]);
    chain.append(block.clone()).unwrap();

    assert!(matches!(
        chain.append(block),
        Err(ChainError::Block(BlockError::InvalidHeight { .. }))
    ));
}

#[test]
fn chains_with_other_masters_do_not_mix() {
    init_tracing();
    let ours = TestFixture::new();
    let theirs = TestFixture::with_seeds([0x07; 32], [0x08; 32]);
    let mut chain = bootstrapped(&ours);

    let foreign = theirs.next_block(chain.tip().unwrap(), Vec::new());
    assert!(matches!(
        chain.append(foreign),
        Err(ChainError::Block(BlockError::InvalidMinerKey))
    ));

    let forged = {
        let mut block = ours.next_block(chain.tip().unwrap(), Vec::new());
        block.header.miner = ours.master_key();
        block.header.signature = Keypair::from_seed(&[0x07; 32]).sign(&block.header.hash().0);
        block
    };
    assert!(matches!(
        chain.append(forged),
        Err(ChainError::Block(BlockError::InvalidSignature))
    ));
}
