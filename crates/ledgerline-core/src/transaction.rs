//! Transaction envelope.
//!
//! Every transaction kind travels inside a [`Transaction`]: a signed header
//! (version, type tag, nonce, timestamp, sender, signature) plus the
//! kind-specific payload. Identity is derived from the canonical encoding:
//! `hash = Blake3(encode())`, `id` is the first 8 bytes of the hash.

use std::any::Any;
use std::fmt;

use crate::canonical::{decode_fields, encode_fields, Field};
use crate::crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair};
use crate::error::{CodecError, StateError, TxError};
use crate::registry::TxRegistry;
use crate::state::State;
use crate::types::{Address, TxId, TxType};

/// The current envelope version.
pub const TX_VERSION: u8 = 0;

/// Domain separation prefix for transaction hashes.
pub const TX_DOMAIN: &[u8] = b"ledgerline/tx/v1";

/// Domain separation prefix for transaction signatures.
pub const TX_SIGN_DOMAIN: &[u8] = b"ledgerline/tx-sig/v1";

/// Number of fields in an encoded envelope.
const ENVELOPE_FIELDS: usize = 7;

/// A concrete transaction kind.
///
/// Implementations decode their own payload, check their own rules and apply
/// their own state transition. `execute` is only called after `verify`
/// succeeded and must be deterministic: no clock, no randomness.
pub trait TxObject: fmt::Debug + Send + Sync + 'static {
    /// The tag this kind is registered under.
    fn tx_type(&self) -> TxType;

    /// Human-readable kind name.
    fn kind_name(&self) -> &'static str;

    /// Canonical payload bytes.
    fn encode(&self) -> Vec<u8>;

    /// Populate this instance from canonical payload bytes.
    fn decode(&mut self, data: &[u8]) -> Result<(), CodecError>;

    /// Kind-specific validation.
    fn verify(&self, tx: &Transaction) -> Result<(), TxError>;

    /// Apply the state transition.
    fn execute(&self, tx: &Transaction, state: &mut dyn State) -> Result<(), StateError>;

    fn clone_object(&self) -> Box<dyn TxObject>;

    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn TxObject> {
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

/// Metadata common to every transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHeader {
    /// Envelope version (currently 0).
    pub version: u8,

    /// Kind tag of the payload.
    pub tx_type: TxType,

    /// Sender-chosen sequence number.
    pub nonce: u64,

    /// Sender-claimed timestamp (Unix microseconds). Untrusted.
    pub timestamp: i64,

    /// The sender's public key.
    pub sender: Ed25519PublicKey,

    /// Signature over the signing hash.
    pub signature: Ed25519Signature,
}

/// A signed transaction envelope.
#[derive(Debug, Clone)]
pub struct Transaction {
    header: TxHeader,
    object: Box<dyn TxObject>,
}

impl Transaction {
    /// Build and sign a transaction carrying `object`.
    pub fn new(keypair: &Keypair, object: Box<dyn TxObject>, nonce: u64, timestamp: i64) -> Self {
        let mut tx = Self {
            header: TxHeader {
                version: TX_VERSION,
                tx_type: object.tx_type(),
                nonce,
                timestamp,
                sender: keypair.public_key(),
                signature: Ed25519Signature::ZERO,
            },
            object,
        };
        tx.header.signature = keypair.sign(tx.signing_hash().as_bytes());
        tx
    }

    /// Assemble a transaction from parts without signing.
    pub fn from_parts(header: TxHeader, object: Box<dyn TxObject>) -> Self {
        Self { header, object }
    }

    pub fn header(&self) -> &TxHeader {
        &self.header
    }

    pub fn object(&self) -> &dyn TxObject {
        self.object.as_ref()
    }

    /// Downcast the payload to a concrete kind.
    pub fn object_as<T: TxObject>(&self) -> Option<&T> {
        self.object.as_any().downcast_ref::<T>()
    }

    pub fn tx_type(&self) -> TxType {
        self.header.tx_type
    }

    pub fn sender(&self) -> &Ed25519PublicKey {
        &self.header.sender
    }

    /// The state address owned by the sender.
    pub fn sender_address(&self) -> Address {
        Address::from_public_key(&self.header.sender)
    }

    fn unsigned_fields(&self) -> Vec<Field> {
        vec![
            Field::uint(self.header.version),
            Field::uint(self.header.tx_type),
            Field::uint(self.header.nonce),
            Field::int(self.header.timestamp),
            Field::bytes(self.header.sender.as_bytes()),
            Field::bytes(self.object.encode()),
        ]
    }

    /// Canonical bytes covered by the signature (everything but the signature).
    pub fn signing_bytes(&self) -> Vec<u8> {
        encode_fields(&self.unsigned_fields())
    }

    /// The message hash the sender signs.
    pub fn signing_hash(&self) -> Blake3Hash {
        Blake3Hash::hash_with_domain(TX_SIGN_DOMAIN, &self.signing_bytes())
    }

    /// Full canonical encoding, signature included.
    pub fn encode(&self) -> Vec<u8> {
        let mut fields = self.unsigned_fields();
        fields.push(Field::bytes(self.header.signature.as_bytes()));
        encode_fields(&fields)
    }

    /// Decode an envelope, resolving its kind through `registry`.
    pub fn decode_with(registry: &TxRegistry, bytes: &[u8]) -> Result<Self, TxError> {
        let mut fields = decode_fields(bytes)?.expect_len(ENVELOPE_FIELDS)?;

        let version = fields.next_u8()?;
        let tx_type = fields.next_u8()?;
        let mut object = registry.new_by_type(tx_type)?;

        let nonce = fields.next_u64()?;
        let timestamp = fields.next_i64()?;
        let sender = Ed25519PublicKey(fields.next_array::<32>()?);
        let payload = fields.next_bytes()?;
        let signature = Ed25519Signature(fields.next_array::<64>()?);

        object.decode(&payload)?;

        Ok(Self {
            header: TxHeader {
                version,
                tx_type,
                nonce,
                timestamp,
                sender,
                signature,
            },
            object,
        })
    }

    /// Hash of the canonical encoding.
    pub fn hash(&self) -> Blake3Hash {
        Blake3Hash::hash_with_domain(TX_DOMAIN, &self.encode())
    }

    /// Numeric ID: the first 8 bytes of the hash, big-endian.
    pub fn id(&self) -> TxId {
        TxId::from_hash(&self.hash())
    }

    /// Hex text of the numeric ID.
    pub fn str_id(&self) -> String {
        self.id().to_hex()
    }

    /// Envelope checks followed by the kind's own rules.
    pub fn verify(&self) -> Result<(), TxError> {
        if self.header.version != TX_VERSION {
            return Err(TxError::UnsupportedVersion(self.header.version));
        }
        if self.header.tx_type != self.object.tx_type() {
            return Err(TxError::UnsupportedType(self.header.tx_type));
        }
        if self.header.sender.is_empty() {
            return Err(TxError::EmptySender);
        }
        self.header
            .sender
            .verify(self.signing_hash().as_bytes(), &self.header.signature)
            .map_err(|_| TxError::InvalidSignature)?;

        self.object.verify(self)
    }

    /// Apply the kind's state transition.
    pub fn execute(&self, state: &mut dyn State) -> Result<(), StateError> {
        self.object.execute(self, state)
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.object.tx_type() == other.object.tx_type()
            && self.object.encode() == other.object.encode()
    }
}

impl Eq for Transaction {}
