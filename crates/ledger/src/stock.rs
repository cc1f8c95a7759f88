//! Stock ledger: keeps `Item::current_stock` (and `sale_price`) consistent
//! with the set of non-deleted bills.
//!
//! Quantities are applied as signed deltas: +qty for purchase lines, -qty
//! for sales lines. Edits retract the old bill's lines wholesale before
//! applying the new ones, because the item set itself may change between
//! versions; a per-item diff is not sufficient.

use std::collections::HashMap;

use dvhs_billing::{BillItem, SalePriceMap};
use dvhs_catalog::Item;
use dvhs_core::{ItemId, LedgerError, LedgerResult};

/// What to do when an operation would take an item's stock negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockPolicy {
    /// Permit negative stock silently (historical behavior).
    #[default]
    Allow,
    /// Permit it, but log a warning per affected item.
    Warn,
    /// Fail the operation before any mutation.
    Reject,
}

/// Apply one bill's lines to the item collection with the given sign.
///
/// `sale_prices` is only consulted on the purchase apply phase (positive
/// sign); a matching entry overwrites the item's catalog sale price.
pub(crate) fn apply_lines(
    items: &mut [Item],
    lines: &[BillItem],
    sign: i64,
    sale_prices: Option<&SalePriceMap>,
) {
    for line in lines {
        if let Some(item) = items.iter_mut().find(|it| it.id == line.item_id) {
            item.current_stock += sign * line.quantity;
            if sign > 0 {
                if let Some(price) = sale_prices.and_then(|prices| prices.get(&item.id)) {
                    item.sale_price = *price;
                }
            }
        }
    }
}

/// Net per-item stock change of one bill's lines under the given sign.
pub(crate) fn line_deltas(lines: &[BillItem], sign: i64) -> HashMap<ItemId, i64> {
    let mut deltas = HashMap::new();
    for line in lines {
        *deltas.entry(line.item_id).or_insert(0) += sign * line.quantity;
    }
    deltas
}

/// Fold a second delta map into the first (used for retract-then-reapply,
/// where the net effect is `new - old`).
pub(crate) fn merge_deltas(into: &mut HashMap<ItemId, i64>, other: HashMap<ItemId, i64>) {
    for (id, delta) in other {
        *into.entry(id).or_insert(0) += delta;
    }
}

/// Enforce the negative-stock policy against the would-be resulting stock
/// levels, before anything is mutated.
pub(crate) fn check_policy(
    policy: StockPolicy,
    items: &[Item],
    deltas: &HashMap<ItemId, i64>,
) -> LedgerResult<()> {
    if policy == StockPolicy::Allow {
        return Ok(());
    }
    for (item_id, delta) in deltas {
        let Some(item) = items.iter().find(|it| it.id == *item_id) else {
            continue;
        };
        let resulting = item.current_stock + delta;
        if resulting < 0 {
            match policy {
                StockPolicy::Allow => {}
                StockPolicy::Warn => {
                    tracing::warn!(
                        item = %item.code,
                        stock = resulting,
                        "operation takes stock negative"
                    );
                }
                StockPolicy::Reject => {
                    return Err(LedgerError::validation(format!(
                        "insufficient stock for item {}: {} available, operation leaves {}",
                        item.code, item.current_stock, resulting
                    )));
                }
            }
        }
    }
    Ok(())
}
