//! The serializable state tree.

use serde::{Deserialize, Serialize};

use dvhs_billing::{PurchaseBill, SalesBill};
use dvhs_catalog::{Category, Item, Unit, Vendor};
use dvhs_core::{CategoryId, UnitId};

use crate::audit::AuditEntry;

/// Complete state tree handed to and from the persistence gateway.
///
/// Serializes to a single JSON object with camelCase keys; dates are
/// ISO-8601 strings. The gateway only mirrors this structure, it never
/// mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub purchase_bills: Vec<PurchaseBill>,
    #[serde(default)]
    pub sales_bills: Vec<SalesBill>,
    #[serde(default)]
    pub logs: Vec<AuditEntry>,
}

impl Snapshot {
    /// First-boot state: empty collections plus the stock reference
    /// tables every fresh installation starts with.
    pub fn seeded() -> Self {
        let categories = ["Stationery", "Electronics", "Furniture", "Lab Equipment"]
            .into_iter()
            .map(|name| Category {
                id: CategoryId::new(),
                name: name.to_string(),
            })
            .collect();
        let units = ["Pcs", "Kg", "Box", "Set"]
            .into_iter()
            .map(|name| Unit {
                id: UnitId::new(),
                name: name.to_string(),
            })
            .collect();
        Self {
            categories,
            units,
            ..Self::default()
        }
    }
}
