//! Bill types for the inventory ledger: purchase bills (incoming stock)
//! and sales/issue bills (outgoing stock).
//!
//! All derived amounts (line totals, bill totals, balances, payment
//! status) are computed here, authoritatively; callers may populate the
//! derived fields however they like, the engine recomputes them before
//! anything is stored.

pub mod line;
pub mod payment;
pub mod purchase;
pub mod sales;

pub use line::BillItem;
pub use payment::{PaymentMode, PaymentStatus};
pub use purchase::{PurchaseBill, PurchaseDraft, SalePriceMap};
pub use sales::{IssuedToType, SalesBill, SalesDraft};
