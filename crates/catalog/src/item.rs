use serde::{Deserialize, Serialize};

use dvhs_core::{CategoryId, ItemId, LedgerError, LedgerResult, UnitId};

/// Item category (reference table, append-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Unit of measure (reference table, append-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
}

/// Whether an item is consumed on issue or tracked as an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    Consumable,
    Asset,
}

/// Catalog item.
///
/// `current_stock` is derived state: it is mutated only by the stock
/// ledger as bills are created, edited, and deleted, and is never taken
/// from callers. `sale_price` is mutable and gets overwritten when a
/// purchase bill supplies a new price for the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    pub category_id: CategoryId,
    pub unit_id: UnitId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub default_location: String,
    pub min_stock_level: i64,
    pub current_stock: i64,
    /// Smallest currency unit (e.g. paise).
    pub sale_price: i64,
}

impl Item {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("item name cannot be empty"));
        }
        if self.min_stock_level < 0 {
            return Err(LedgerError::validation("minimum stock level cannot be negative"));
        }
        if self.sale_price < 0 {
            return Err(LedgerError::validation("sale price cannot be negative"));
        }
        Ok(())
    }

    /// Low-stock check used by the dashboard: at or below the minimum.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock_level
    }
}

/// Item creation input: everything but the ledger-assigned id/code and
/// the derived `current_stock` (which always starts at zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub category_id: CategoryId,
    pub unit_id: UnitId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub default_location: String,
    pub min_stock_level: i64,
    pub sale_price: i64,
}

impl NewItem {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("item name cannot be empty"));
        }
        if self.min_stock_level < 0 {
            return Err(LedgerError::validation("minimum stock level cannot be negative"));
        }
        if self.sale_price < 0 {
            return Err(LedgerError::validation("sale price cannot be negative"));
        }
        Ok(())
    }

    /// Promote the draft into a full record; stock starts at zero.
    pub fn into_item(self, id: ItemId, code: String) -> Item {
        Item {
            id,
            code,
            name: self.name,
            category_id: self.category_id,
            unit_id: self.unit_id,
            item_type: self.item_type,
            default_location: self.default_location,
            min_stock_level: self.min_stock_level,
            current_stock: 0,
            sale_price: self.sale_price,
        }
    }
}
