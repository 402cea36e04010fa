//! # Ledgerline Objects
//!
//! Concrete transaction kinds.
//!
//! ## Kinds
//!
//! | tag | kind | effect |
//! |---|---|---|
//! | `0x01` | [`User`] | claims a nickname for the sender |
//!
//! Each kind is added to a registry through [`register`]. A tag collision
//! between compiled-in kinds is reported as
//! [`RegistryError::AlreadyRegistered`].

pub mod error;
pub mod user;

pub use error::UserError;
pub use user::{User, TX_USER, USER_DATA_SIZE_LIMIT};

use ledgerline_core::{RegistryError, TxRegistry};

/// Register every kind defined in this crate.
pub fn register(registry: &mut TxRegistry) -> Result<(), RegistryError> {
    registry.register(TX_USER, User::boxed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all() {
        let mut registry = TxRegistry::new();
        register(&mut registry).unwrap();
        assert_eq!(registry.type_name(TX_USER), "user");
    }

    #[test]
    fn test_register_twice_collides() {
        let mut registry = TxRegistry::new();
        register(&mut registry).unwrap();
        assert_eq!(
            register(&mut registry).unwrap_err(),
            RegistryError::AlreadyRegistered(TX_USER)
        );
    }
}
