//! `dvhs-ledger` — the inventory and billing ledger core.
//!
//! A single [`Ledger`] service object owns the whole state tree (vendors,
//! categories, units, items, purchase bills, sales bills, audit log) and
//! exposes every mutating operation behind an explicit interface. The
//! presentation layer receives this interface and computed fields only;
//! it performs no business logic of its own.
//!
//! Every successful mutation appends one audit entry and hands the full
//! snapshot to the injected [`store::SnapshotStore`]. Execution is
//! single-threaded and synchronous: an operation either fully applies or,
//! on a validation failure, leaves the tree untouched.

pub mod audit;
pub mod service;
pub mod state;
pub mod stock;
pub mod store;
pub mod telemetry;

pub use audit::{AuditAction, AuditEntry, LOG_CAP};
pub use service::{Ledger, LedgerConfig};
pub use state::Snapshot;
pub use stock::StockPolicy;
pub use store::{InMemoryStore, JsonFileStore, SnapshotStore, StoreError};
