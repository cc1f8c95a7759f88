//! Human-readable code and invoice-number generation.
//!
//! Codes are sequential and zero-padded (`VND-0001`, `ITM-0042`); invoice
//! numbers are sequenced per bill kind and calendar year
//! (`DVHS-PUR-2026-0003`).
//!
//! The default numbering scheme derives the next sequence from the current
//! collection length. After a deletion the next code can therefore collide
//! with a previously issued one; that behavior is preserved for
//! compatibility with existing ledgers. [`Numbering::Monotonic`] opts into
//! collision-free numbering by scanning for the highest sequence already
//! issued.

use serde::{Deserialize, Serialize};

/// Vendor code prefix (`VND-NNNN`).
pub const VENDOR_PREFIX: &str = "VND";

/// Item code prefix (`ITM-NNNN`).
pub const ITEM_PREFIX: &str = "ITM";

/// Institution tag carried by every invoice number.
pub const INVOICE_ORG: &str = "DVHS";

/// Which side of the ledger a bill sits on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillKind {
    Purchase,
    Sales,
}

impl BillKind {
    /// Short tag used inside invoice numbers.
    pub fn tag(self) -> &'static str {
        match self {
            BillKind::Purchase => "PUR",
            BillKind::Sales => "SAL",
        }
    }
}

/// Sequence-numbering policy for codes and invoice numbers.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Numbering {
    /// Next sequence = collection length + 1. Matches the historical
    /// behavior; sequence numbers are reused after deletions.
    #[default]
    LengthBased,
    /// Next sequence = highest sequence ever issued + 1, recovered by
    /// parsing the existing codes. Never reuses a number.
    Monotonic,
}

/// Format a code for an explicit sequence number.
pub fn code(prefix: &str, seq: u32) -> String {
    format!("{prefix}-{seq:04}")
}

/// Next code under length-based numbering.
pub fn next_code(prefix: &str, existing_count: usize) -> String {
    code(prefix, existing_count as u32 + 1)
}

/// Parse the sequence number out of a code with the given prefix.
pub fn code_sequence(code: &str, prefix: &str) -> Option<u32> {
    code.strip_prefix(prefix)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

/// Format an invoice number for an explicit sequence number.
pub fn invoice_no(kind: BillKind, year: i32, seq: u32) -> String {
    format!("{INVOICE_ORG}-{}-{year}-{seq:04}", kind.tag())
}

/// Next invoice number under length-based numbering.
pub fn next_invoice_no(kind: BillKind, year: i32, existing_count_for_year: usize) -> String {
    invoice_no(kind, year, existing_count_for_year as u32 + 1)
}

/// Parse the sequence number out of an invoice number, if it belongs to
/// the given kind and year.
pub fn invoice_sequence(invoice: &str, kind: BillKind, year: i32) -> Option<u32> {
    invoice
        .strip_prefix(&format!("{INVOICE_ORG}-{}-{year}-", kind.tag()))?
        .parse()
        .ok()
}

/// Decompose an invoice number into its kind, year, and sequence.
pub fn parse_invoice(invoice: &str) -> Option<(BillKind, i32, u32)> {
    let rest = invoice.strip_prefix(INVOICE_ORG)?.strip_prefix('-')?;
    let (tag, rest) = rest.split_once('-')?;
    let kind = match tag {
        "PUR" => BillKind::Purchase,
        "SAL" => BillKind::Sales,
        _ => return None,
    };
    let (year, seq) = rest.split_once('-')?;
    Some((kind, year.parse().ok()?, seq.parse().ok()?))
}
