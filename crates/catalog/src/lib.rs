//! Master data for the inventory ledger: vendors, categories, units, items.
//!
//! Types here carry field-level validation only. Cross-entity rules
//! (foreign references, deletion guards) are enforced by the ledger
//! service that owns the collections.

pub mod item;
pub mod vendor;

pub use item::{Category, Item, ItemType, NewItem, Unit};
pub use vendor::{NewVendor, PaymentTerm, Vendor};
