//! Error types for transaction kinds.

use thiserror::Error;

/// Rules broken by a user registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("incorrect nickname")]
    InvalidNickname,

    #[error("data is too long: {len} bytes (max {max})")]
    DataTooLong { len: usize, max: usize },
}
