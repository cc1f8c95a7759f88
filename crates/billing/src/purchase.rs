use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dvhs_catalog::PaymentTerm;
use dvhs_core::{BillId, ItemId, LedgerError, LedgerResult, VendorId};

use crate::line::{normalize_lines, BillItem};
use crate::payment::{PaymentMode, PaymentStatus};

/// Optional per-item sale-price overrides supplied alongside a purchase:
/// when present, the referenced item's catalog sale price is overwritten
/// during the stock apply phase.
pub type SalePriceMap = HashMap<ItemId, i64>;

/// Purchase bill: incoming stock from a vendor.
///
/// `invoice_no`, `total_amount`, `balance_amount`, and `payment_status`
/// are assigned by the engine; whatever a caller supplies in those fields
/// is overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBill {
    pub id: BillId,
    pub invoice_no: String,
    pub date: NaiveDate,
    pub vendor_id: VendorId,
    pub payment_term: PaymentTerm,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub items: Vec<BillItem>,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub balance_amount: i64,
    pub remarks: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifsc_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
}

impl PurchaseBill {
    /// Recompute every derived field from the line items and paid amount.
    pub fn recompute(&mut self) -> LedgerResult<()> {
        if self.paid_amount < 0 {
            return Err(LedgerError::validation("paid amount cannot be negative"));
        }
        self.total_amount = normalize_lines(&mut self.items)?;
        self.balance_amount = self.total_amount - self.paid_amount;
        self.payment_status = PaymentStatus::from_amounts(self.paid_amount, self.total_amount);
        Ok(())
    }
}

/// Purchase creation input: everything the engine derives is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDraft {
    pub date: NaiveDate,
    pub vendor_id: VendorId,
    pub payment_term: PaymentTerm,
    pub payment_mode: PaymentMode,
    pub items: Vec<BillItem>,
    pub paid_amount: i64,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
    #[serde(default)]
    pub upi_id: Option<String>,
    /// Sale-price overrides applied to the referenced items on creation.
    #[serde(default)]
    pub item_sale_prices: SalePriceMap,
}

impl PurchaseDraft {
    /// Build the stored bill, deriving totals, balance, and status.
    pub fn into_bill(self, id: BillId, invoice_no: String) -> LedgerResult<PurchaseBill> {
        let mut bill = PurchaseBill {
            id,
            invoice_no,
            date: self.date,
            vendor_id: self.vendor_id,
            payment_term: self.payment_term,
            payment_mode: self.payment_mode,
            payment_status: PaymentStatus::Unpaid,
            items: self.items,
            total_amount: 0,
            paid_amount: self.paid_amount,
            balance_amount: 0,
            remarks: self.remarks,
            bank_name: self.bank_name,
            ifsc_code: self.ifsc_code,
            upi_id: self.upi_id,
        };
        bill.recompute()?;
        Ok(bill)
    }
}
