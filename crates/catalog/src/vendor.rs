use serde::{Deserialize, Serialize};

use dvhs_core::{LedgerError, LedgerResult, VendorId};

/// Payment terms agreed with a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTerm {
    Immediate,
    #[serde(rename = "Net 15 Days")]
    Net15Days,
    #[serde(rename = "Net 30 Days")]
    Net30Days,
    Custom,
}

/// Vendor master record.
///
/// `code` is assigned by the ledger at creation (`VND-NNNN`) and never
/// supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub code: String,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_no: Option<String>,
    pub payment_terms: PaymentTerm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifsc_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
}

/// Vendor creation input: everything but the ledger-assigned id and code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVendor {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub gst_no: Option<String>,
    pub payment_terms: PaymentTerm,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub upi_id: Option<String>,
}

impl NewVendor {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("vendor name cannot be empty"));
        }
        Ok(())
    }

    /// Promote the draft into a full record with a ledger-assigned id/code.
    pub fn into_vendor(self, id: VendorId, code: String) -> Vendor {
        Vendor {
            id,
            code,
            name: self.name,
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
            address: self.address,
            gst_no: self.gst_no,
            payment_terms: self.payment_terms,
            bank_name: self.bank_name,
            ifsc_code: self.ifsc_code,
            account_number: self.account_number,
            upi_id: self.upi_id,
        }
    }
}

impl Vendor {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("vendor name cannot be empty"));
        }
        Ok(())
    }
}
