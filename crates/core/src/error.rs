//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger core.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Validation and referential-integrity failures are raised *before* any
/// state mutation; an operation either fully applies or leaves the tree
/// untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A create/update referenced a missing foreign entity, or a field was
    /// missing/malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A delete was attempted on an entity still referenced by a bill.
    #[error("referential integrity: {0}")]
    ReferentialIntegrity(String),

    /// The targeted entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The durability layer failed (surfaced at load time only; save
    /// failures are logged, not returned).
    #[error("persistence failed: {0}")]
    Persistence(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn referential(msg: impl Into<String>) -> Self {
        Self::ReferentialIntegrity(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
