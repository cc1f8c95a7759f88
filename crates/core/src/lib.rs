//! `dvhs-core` — foundation building blocks for the inventory ledger.
//!
//! This crate contains **pure domain** primitives (no storage, no IO):
//! typed identifiers, the error model, and code/invoice-number generation.

pub mod codes;
pub mod error;
pub mod id;

pub use codes::{BillKind, Numbering};
pub use error::{LedgerError, LedgerResult};
pub use id::{AuditEntryId, BillId, CategoryId, ItemId, UnitId, VendorId};
