use serde::{Deserialize, Serialize};

use dvhs_core::{ItemId, LedgerError, LedgerResult};

/// One line within a bill: a catalog item, a quantity, and a rate.
///
/// `total` is derived; the engine recomputes it as `quantity * rate`
/// whenever a bill is created or edited, so a caller-supplied total is
/// never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub item_id: ItemId,
    pub quantity: i64,
    /// Smallest currency unit per item (e.g. paise).
    pub rate: i64,
    #[serde(default)]
    pub total: i64,
}

impl BillItem {
    pub fn new(item_id: ItemId, quantity: i64, rate: i64) -> Self {
        Self {
            item_id,
            quantity,
            rate,
            total: quantity * rate,
        }
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.quantity <= 0 {
            return Err(LedgerError::validation("line quantity must be positive"));
        }
        if self.rate < 0 {
            return Err(LedgerError::validation("line rate cannot be negative"));
        }
        Ok(())
    }

    /// Overwrite `total` with the derived value.
    pub fn recompute_total(&mut self) {
        self.total = self.quantity * self.rate;
    }
}

/// Validate every line and recompute totals; returns the sum of line totals.
pub(crate) fn normalize_lines(lines: &mut [BillItem]) -> LedgerResult<i64> {
    if lines.is_empty() {
        return Err(LedgerError::validation("a bill needs at least one line item"));
    }
    let mut sum = 0;
    for line in lines.iter_mut() {
        line.validate()?;
        line.recompute_total();
        sum += line.total;
    }
    Ok(sum)
}
