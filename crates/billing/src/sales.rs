use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dvhs_core::{BillId, LedgerError, LedgerResult};

use crate::line::{normalize_lines, BillItem};
use crate::payment::{PaymentMode, PaymentStatus};

/// Who a sales/issue bill was raised against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssuedToType {
    Student,
    Teacher,
    Other,
}

/// Sales (issue) bill: outgoing stock.
///
/// `invoice_no`, `total_amount`, `final_amount`, `balance_amount`, and
/// `payment_status` are assigned by the engine. The discount is validated
/// non-negative but deliberately not capped at the bill total, matching
/// the historical behavior; `final_amount` can therefore go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesBill {
    pub id: BillId,
    pub invoice_no: String,
    pub date: NaiveDate,
    pub issued_to: String,
    pub issued_to_type: IssuedToType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_recipient_name: Option<String>,
    pub items: Vec<BillItem>,
    pub total_amount: i64,
    pub discount: i64,
    pub final_amount: i64,
    pub paid_amount: i64,
    pub balance_amount: i64,
    pub payment_status: PaymentStatus,
    pub payment_mode: PaymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    #[serde(default)]
    pub remarks: String,
}

impl SalesBill {
    /// Recompute every derived field from the line items, discount, and
    /// paid amount. Status is judged against the post-discount amount.
    pub fn recompute(&mut self) -> LedgerResult<()> {
        validate_recipient(self.issued_to_type, self.other_recipient_name.as_deref())?;
        if self.discount < 0 {
            return Err(LedgerError::validation("discount cannot be negative"));
        }
        if self.paid_amount < 0 {
            return Err(LedgerError::validation("paid amount cannot be negative"));
        }
        self.total_amount = normalize_lines(&mut self.items)?;
        self.final_amount = self.total_amount - self.discount;
        self.balance_amount = self.final_amount - self.paid_amount;
        self.payment_status = PaymentStatus::from_amounts(self.paid_amount, self.final_amount);
        Ok(())
    }
}

fn validate_recipient(kind: IssuedToType, other_name: Option<&str>) -> LedgerResult<()> {
    if kind == IssuedToType::Other && other_name.map_or(true, |n| n.trim().is_empty()) {
        return Err(LedgerError::validation(
            "recipient name is required when issuing to 'Other'",
        ));
    }
    Ok(())
}

/// Sales creation input: everything the engine derives is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDraft {
    pub date: NaiveDate,
    pub issued_to: String,
    pub issued_to_type: IssuedToType,
    #[serde(default)]
    pub other_recipient_name: Option<String>,
    pub items: Vec<BillItem>,
    #[serde(default)]
    pub discount: i64,
    pub paid_amount: i64,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub upi_id: Option<String>,
    #[serde(default)]
    pub remarks: String,
}

impl SalesDraft {
    /// Build the stored bill, deriving totals, final amount, balance, and
    /// status.
    pub fn into_bill(self, id: BillId, invoice_no: String) -> LedgerResult<SalesBill> {
        let mut bill = SalesBill {
            id,
            invoice_no,
            date: self.date,
            issued_to: self.issued_to,
            issued_to_type: self.issued_to_type,
            other_recipient_name: self.other_recipient_name,
            items: self.items,
            total_amount: 0,
            discount: self.discount,
            final_amount: 0,
            paid_amount: self.paid_amount,
            balance_amount: 0,
            payment_status: PaymentStatus::Unpaid,
            payment_mode: self.payment_mode,
            bank_name: self.bank_name,
            upi_id: self.upi_id,
            remarks: self.remarks,
        };
        bill.recompute()?;
        Ok(bill)
    }
}
