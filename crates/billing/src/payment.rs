use serde::{Deserialize, Serialize};

/// How a payment was (or will be) made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Bank,
    Cheque,
}

/// Settlement state of a bill, derived from paid vs. owed amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
}

impl PaymentStatus {
    /// Pure function of (paid, total); no history dependence.
    ///
    /// A zero-total bill is `Unpaid` even when something was paid against
    /// it, matching the historical behavior.
    pub fn from_amounts(paid: i64, total: i64) -> Self {
        if total == 0 {
            return PaymentStatus::Unpaid;
        }
        if paid >= total {
            PaymentStatus::Paid
        } else if paid > 0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}
