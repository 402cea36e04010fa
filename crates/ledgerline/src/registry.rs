//! Process-wide transaction registry.
//!
//! The registry is installed exactly once, before any decode. Installation is
//! explicit through [`install_registry`]; [`registry`] installs the built-in
//! kinds on first use if nothing was installed yet.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use ledgerline_core::{RegistryError, TxRegistry};

static REGISTRY: OnceCell<Arc<TxRegistry>> = OnceCell::new();

/// A registry holding every compiled-in transaction kind.
pub fn builtin_registry() -> Result<TxRegistry, RegistryError> {
    let mut registry = TxRegistry::new();
    ledgerline_objects::register(&mut registry)?;
    Ok(registry)
}

/// Install `registry` as the process-wide registry.
///
/// Fails with [`RegistryError::AlreadyInstalled`] if one is already in place.
pub fn install_registry(registry: TxRegistry) -> Result<(), RegistryError> {
    let kinds = registry.len();
    REGISTRY
        .set(Arc::new(registry))
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    tracing::debug!(kinds, "installed transaction registry");
    Ok(())
}

/// The process-wide registry.
///
/// # Panics
///
/// Panics if nothing was installed and two built-in kinds share a tag. That is
/// a build defect, not a runtime condition.
pub fn registry() -> Arc<TxRegistry> {
    REGISTRY
        .get_or_init(|| {
            let registry = builtin_registry().expect("built-in transaction kinds have unique tags");
            tracing::debug!(kinds = registry.len(), "installed built-in transaction registry");
            Arc::new(registry)
        })
        .clone()
}
