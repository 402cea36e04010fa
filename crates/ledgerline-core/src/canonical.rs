//! Canonical CBOR encoding for deterministic serialization.
//!
//! Every composite value (transaction payload, envelope, block header, block)
//! is encoded as a definite-length CBOR array of its fields in declaration
//! order, following RFC 8949 Core Deterministic Encoding:
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats, no tags, no maps
//!
//! Decoding is strict: the parsed value is re-encoded and must reproduce the
//! input byte for byte, so the encoding is injective and `decode(encode(x))`
//! always yields `x`.

use ciborium::value::Value;
use std::io::Cursor;

use crate::error::CodecError;

/// A value in the canonical field model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Integer(i128),
    Bytes(Vec<u8>),
    Text(String),
    Null,
    List(Vec<Field>),
}

impl Field {
    pub fn uint(n: impl Into<u64>) -> Self {
        let n: u64 = n.into();
        Field::Integer(i128::from(n))
    }

    pub fn int(n: i64) -> Self {
        Field::Integer(i128::from(n))
    }

    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        Field::Bytes(b.as_ref().to_vec())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Field::Text(s.into())
    }

    /// `None` encodes as CBOR null.
    pub fn optional_bytes<B: AsRef<[u8]>>(b: Option<B>) -> Self {
        b.map_or(Field::Null, |b| Field::bytes(b))
    }
}

/// Encode a field list to canonical bytes.
pub fn encode_fields(fields: &[Field]) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_list(&mut buf, fields);
    buf
}

/// Decode canonical bytes into a field reader.
pub fn decode_fields(bytes: &[u8]) -> Result<Fields, CodecError> {
    let mut cursor = Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(&mut cursor).map_err(|e| CodecError::Decoding(e.to_string()))?;

    let items = match from_cbor(value)? {
        Field::List(items) => items,
        _ => return Err(CodecError::NotAList),
    };

    // Re-encoding must reproduce the input exactly (also rejects trailing bytes).
    if encode_fields(&items) != bytes {
        return Err(CodecError::NonCanonical);
    }

    Ok(Fields::new(items))
}

/// Convert a parsed CBOR value into the field model.
fn from_cbor(value: Value) -> Result<Field, CodecError> {
    match value {
        Value::Integer(i) => Ok(Field::Integer(i.into())),
        Value::Bytes(b) => Ok(Field::Bytes(b)),
        Value::Text(s) => Ok(Field::Text(s)),
        Value::Null => Ok(Field::Null),
        Value::Array(arr) => arr
            .into_iter()
            .map(from_cbor)
            .collect::<Result<Vec<_>, _>>()
            .map(Field::List),
        Value::Float(_) => Err(CodecError::Unsupported("float")),
        Value::Tag(..) => Err(CodecError::Unsupported("tag")),
        Value::Map(_) => Err(CodecError::Unsupported("map")),
        Value::Bool(_) => Err(CodecError::Unsupported("bool")),
        _ => Err(CodecError::Unsupported("unknown value")),
    }
}

/// Recursively encode a field.
fn encode_field_to(buf: &mut Vec<u8>, field: &Field) {
    match field {
        Field::Integer(n) => encode_integer(buf, *n),
        Field::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Field::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Field::Null => buf.push(0xf6),
        Field::List(items) => encode_list(buf, items),
    }
}

/// Encode an array (major type 4).
fn encode_list(buf: &mut Vec<u8>, items: &[Field]) {
    encode_uint(buf, 4, items.len() as u64);
    for item in items {
        encode_field_to(buf, item);
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, n: i128) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Sequential reader over a decoded field list.
#[derive(Debug)]
pub struct Fields {
    items: std::vec::IntoIter<Field>,
    index: usize,
    len: usize,
}

impl Fields {
    fn new(items: Vec<Field>) -> Self {
        let len = items.len();
        Self {
            items: items.into_iter(),
            index: 0,
            len,
        }
    }

    /// Total number of fields.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Require exactly `expected` fields.
    pub fn expect_len(self, expected: usize) -> Result<Self, CodecError> {
        if self.len != expected {
            return Err(CodecError::Arity {
                expected,
                got: self.len,
            });
        }
        Ok(self)
    }

    fn next_field(&mut self) -> Result<(usize, Field), CodecError> {
        let index = self.index;
        let field = self.items.next().ok_or(CodecError::Arity {
            expected: index + 1,
            got: self.len,
        })?;
        self.index += 1;
        Ok((index, field))
    }

    fn next_integer(&mut self) -> Result<(usize, i128), CodecError> {
        match self.next_field()? {
            (index, Field::Integer(n)) => Ok((index, n)),
            (index, _) => Err(CodecError::FieldType {
                index,
                expected: "integer",
            }),
        }
    }

    pub fn next_u64(&mut self) -> Result<u64, CodecError> {
        let (index, n) = self.next_integer()?;
        u64::try_from(n).map_err(|_| CodecError::OutOfRange { index })
    }

    pub fn next_u32(&mut self) -> Result<u32, CodecError> {
        let (index, n) = self.next_integer()?;
        u32::try_from(n).map_err(|_| CodecError::OutOfRange { index })
    }

    pub fn next_u8(&mut self) -> Result<u8, CodecError> {
        let (index, n) = self.next_integer()?;
        u8::try_from(n).map_err(|_| CodecError::OutOfRange { index })
    }

    pub fn next_i64(&mut self) -> Result<i64, CodecError> {
        let (index, n) = self.next_integer()?;
        i64::try_from(n).map_err(|_| CodecError::OutOfRange { index })
    }

    pub fn next_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        match self.next_field()? {
            (_, Field::Bytes(b)) => Ok(b),
            (index, _) => Err(CodecError::FieldType {
                index,
                expected: "bytes",
            }),
        }
    }

    /// Read a byte string of exactly `N` bytes.
    pub fn next_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let index = self.index;
        let bytes = self.next_bytes()?;
        bytes.try_into().map_err(|_| CodecError::FieldType {
            index,
            expected: "fixed-length bytes",
        })
    }

    /// Read either null or a byte string of exactly `N` bytes.
    pub fn next_optional_array<const N: usize>(&mut self) -> Result<Option<[u8; N]>, CodecError> {
        match self.next_field()? {
            (_, Field::Null) => Ok(None),
            (index, Field::Bytes(b)) => b.try_into().map(Some).map_err(|_| CodecError::FieldType {
                index,
                expected: "fixed-length bytes",
            }),
            (index, _) => Err(CodecError::FieldType {
                index,
                expected: "bytes or null",
            }),
        }
    }

    pub fn next_text(&mut self) -> Result<String, CodecError> {
        match self.next_field()? {
            (_, Field::Text(s)) => Ok(s),
            (index, _) => Err(CodecError::FieldType {
                index,
                expected: "text",
            }),
        }
    }

    pub fn next_list(&mut self) -> Result<Vec<Field>, CodecError> {
        match self.next_field()? {
            (_, Field::List(items)) => Ok(items),
            (index, _) => Err(CodecError::FieldType {
                index,
                expected: "list",
            }),
        }
    }
}
