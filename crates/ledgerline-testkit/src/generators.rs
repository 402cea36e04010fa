//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ledgerline_core::{Asset, Blake3Hash, Ed25519PublicKey, Keypair, Transaction};
use ledgerline_objects::{User, USER_DATA_SIZE_LIMIT};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random Blake3Hash.
pub fn blake3_hash() -> impl Strategy<Value = Blake3Hash> {
    any::<[u8; 32]>().prop_map(Blake3Hash)
}

/// Generate a random Ed25519PublicKey.
pub fn public_key() -> impl Strategy<Value = Ed25519PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a reasonable timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=i64::MAX / 2
}

/// Generate a nickname accepted by the user kind.
pub fn nickname() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{2,20}".prop_map(String::from)
}

/// Generate an asset of any known type, or raw bytes.
pub fn asset() -> impl Strategy<Value = Asset> {
    prop_oneof![
        any::<u8>().prop_map(Asset::coin),
        (any::<u8>(), prop::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(coin, id)| Asset::counter(coin, id)),
        nickname().prop_map(|nick| Asset::name(&nick)),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Asset::from_bytes),
    ]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Parameters for generating a user registration.
#[derive(Debug, Clone)]
pub struct UserTxParams {
    pub keypair: Keypair,
    pub nick: String,
    pub referrer_id: u64,
    pub data: Vec<u8>,
    pub nonce: u64,
    pub timestamp: i64,
}

impl Arbitrary for UserTxParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            keypair(),
            nickname(),
            any::<u64>(),
            payload(USER_DATA_SIZE_LIMIT),
            any::<u64>(),
            timestamp(),
        )
            .prop_map(|(keypair, nick, referrer_id, data, nonce, timestamp)| UserTxParams {
                keypair,
                nick,
                referrer_id,
                data,
                nonce,
                timestamp,
            })
            .boxed()
    }
}

/// Generate a user registration from parameters.
pub fn user_tx_from_params(params: &UserTxParams) -> Transaction {
    User::new_tx(
        &params.keypair,
        params.nick.as_str(),
        params.referrer_id,
        params.data.clone(),
        params.nonce,
        params.timestamp,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_core::{merkle_root, TxRegistry};

    fn registry() -> TxRegistry {
        let mut registry = TxRegistry::new();
        ledgerline_objects::register(&mut registry).unwrap();
        registry
    }

    proptest! {
        #[test]
        fn test_tx_id_deterministic(params: UserTxParams) {
            let t1 = user_tx_from_params(&params);
            let t2 = user_tx_from_params(&params);

            prop_assert_eq!(t1.hash(), t2.hash());
            prop_assert_eq!(t1.id(), t2.id());
        }

        #[test]
        fn test_generated_user_txs_verify(params: UserTxParams) {
            prop_assert!(user_tx_from_params(&params).verify().is_ok());
        }

        #[test]
        fn test_envelope_decodes_to_itself(params: UserTxParams) {
            let tx = user_tx_from_params(&params);
            let decoded = Transaction::decode_with(&registry(), &tx.encode()).unwrap();

            prop_assert_eq!(decoded.hash(), tx.hash());
            prop_assert_eq!(decoded, tx);
        }

        #[test]
        fn test_tx_id_unique_with_different_nick(
            kp in keypair(),
            n1 in nickname(),
            n2 in nickname(),
        ) {
            prop_assume!(n1 != n2);

            let t1 = User::new_tx(&kp, n1, 0, Vec::<u8>::new(), 1, 1000);
            let t2 = User::new_tx(&kp, n2, 0, Vec::<u8>::new(), 1, 1000);

            prop_assert_ne!(t1.id(), t2.id());
        }

        #[test]
        fn test_asset_text_roundtrip(a in asset()) {
            let parsed: Asset = a.to_string().parse().unwrap();
            prop_assert_eq!(parsed, a);
        }

        #[test]
        fn test_merkle_root_order_sensitive(a in blake3_hash(), b in blake3_hash()) {
            prop_assume!(a != b);
            prop_assert_ne!(merkle_root(&[a, b]), merkle_root(&[b, a]));
        }
    }
}
