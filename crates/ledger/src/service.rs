//! The ledger service: entity repositories, the transaction engine with
//! its embedded stock ledger, and the audit trail, behind one interface.

use std::collections::HashMap;

use chrono::Datelike;

use dvhs_billing::{
    BillItem, PurchaseBill, PurchaseDraft, SalePriceMap, SalesBill, SalesDraft,
};
use dvhs_catalog::{Category, Item, NewItem, NewVendor, Unit, Vendor};
use dvhs_core::codes::{self, BillKind, Numbering};
use dvhs_core::{BillId, CategoryId, ItemId, LedgerError, LedgerResult, UnitId, VendorId};

use crate::audit::{self, AuditAction, AuditEntry};
use crate::state::Snapshot;
use crate::stock::{self, StockPolicy};
use crate::store::SnapshotStore;

/// Tunable behavior of a ledger instance.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Code/invoice sequence policy. The default reproduces the
    /// historical length-based numbering, including its sequence reuse
    /// after deletions.
    pub numbering: Numbering,
    /// Negative-stock policy (permissive by default).
    pub stock_policy: StockPolicy,
    /// Actor name stamped on audit entries (single-actor system).
    pub actor: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            numbering: Numbering::default(),
            stock_policy: StockPolicy::default(),
            actor: "Admin".to_string(),
        }
    }
}

/// Highest sequence issued so far, tracked per code family.
///
/// Only consulted under [`Numbering::Monotonic`]. Counters are seeded by
/// scanning the loaded snapshot, so a restarted process never collides
/// with a code that is still present; within a process they are strictly
/// monotonic even across deletions.
#[derive(Debug, Default)]
struct SeqCounters {
    vendors: u32,
    items: u32,
    invoices: HashMap<(BillKind, i32), u32>,
}

impl SeqCounters {
    fn scan(state: &Snapshot) -> Self {
        let mut counters = Self {
            vendors: state
                .vendors
                .iter()
                .filter_map(|v| codes::code_sequence(&v.code, codes::VENDOR_PREFIX))
                .max()
                .unwrap_or(0),
            items: state
                .items
                .iter()
                .filter_map(|it| codes::code_sequence(&it.code, codes::ITEM_PREFIX))
                .max()
                .unwrap_or(0),
            invoices: HashMap::new(),
        };
        let purchase = state.purchase_bills.iter().map(|b| b.invoice_no.as_str());
        let sales = state.sales_bills.iter().map(|b| b.invoice_no.as_str());
        for invoice in purchase.chain(sales) {
            if let Some((kind, year, seq)) = codes::parse_invoice(invoice) {
                let slot = counters.invoices.entry((kind, year)).or_insert(0);
                *slot = (*slot).max(seq);
            }
        }
        counters
    }

    fn note_invoice(&mut self, kind: BillKind, year: i32, seq: u32) {
        let slot = self.invoices.entry((kind, year)).or_insert(0);
        *slot = (*slot).max(seq);
    }
}

/// The single-tenant inventory & billing ledger.
///
/// Owns the state tree exclusively; the persistence gateway only mirrors
/// it. All operations are synchronous and atomic against the in-memory
/// tree: validation happens up front, and nothing is mutated on failure.
#[derive(Debug)]
pub struct Ledger<S: SnapshotStore> {
    state: Snapshot,
    store: S,
    config: LedgerConfig,
    counters: SeqCounters,
}

impl<S: SnapshotStore> Ledger<S> {
    /// Open a ledger with default configuration, loading the persisted
    /// snapshot or seeding a fresh one.
    pub fn open(store: S) -> LedgerResult<Self> {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Open a ledger with explicit configuration.
    ///
    /// Load failures surface here; this is the only point where the
    /// gateway can fail an operation.
    pub fn with_config(store: S, config: LedgerConfig) -> LedgerResult<Self> {
        let state = store
            .load()
            .map_err(|e| LedgerError::persistence(e.to_string()))?
            .unwrap_or_else(Snapshot::seeded);
        let counters = SeqCounters::scan(&state);
        Ok(Self {
            state,
            store,
            config,
            counters,
        })
    }

    // ---- read access -----------------------------------------------------

    pub fn vendors(&self) -> &[Vendor] {
        &self.state.vendors
    }

    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    pub fn units(&self) -> &[Unit] {
        &self.state.units
    }

    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    pub fn purchase_bills(&self) -> &[PurchaseBill] {
        &self.state.purchase_bills
    }

    pub fn sales_bills(&self) -> &[SalesBill] {
        &self.state.sales_bills
    }

    pub fn logs(&self) -> &[AuditEntry] {
        &self.state.logs
    }

    /// The full state tree, as handed to the persistence gateway.
    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    // ---- vendors ---------------------------------------------------------

    pub fn add_vendor(&mut self, draft: NewVendor) -> LedgerResult<Vendor> {
        draft.validate()?;
        let seq = self.next_vendor_seq();
        let vendor = draft.into_vendor(VendorId::new(), codes::code(codes::VENDOR_PREFIX, seq));
        self.counters.vendors = self.counters.vendors.max(seq);
        self.state.vendors.push(vendor.clone());
        self.record(
            AuditAction::Create,
            "Vendor",
            format!("Added vendor {}", vendor.name),
        );
        self.persist();
        Ok(vendor)
    }

    /// Replace the vendor with the matching id. A missing id is a no-op:
    /// nothing changes, nothing is logged.
    ///
    /// The stored `code` is preserved; codes are ledger-assigned.
    pub fn update_vendor(&mut self, vendor: Vendor) -> LedgerResult<()> {
        vendor.validate()?;
        let Some(stored) = self.state.vendors.iter_mut().find(|v| v.id == vendor.id) else {
            return Ok(());
        };
        let code = stored.code.clone();
        *stored = Vendor { code, ..vendor };
        let name = stored.name.clone();
        self.record(AuditAction::Edit, "Vendor", format!("Updated vendor {name}"));
        self.persist();
        Ok(())
    }

    /// Remove a vendor, unless any purchase bill still references it.
    pub fn delete_vendor(&mut self, id: VendorId) -> LedgerResult<()> {
        if self.state.purchase_bills.iter().any(|b| b.vendor_id == id) {
            return Err(LedgerError::referential(
                "cannot delete vendor with linked purchase bills",
            ));
        }
        let Some(pos) = self.state.vendors.iter().position(|v| v.id == id) else {
            return Err(LedgerError::not_found(format!("vendor {id}")));
        };
        let vendor = self.state.vendors.remove(pos);
        self.record(
            AuditAction::Delete,
            "Vendor",
            format!("Deleted vendor {}", vendor.name),
        );
        self.persist();
        Ok(())
    }

    // ---- items -----------------------------------------------------------

    pub fn add_item(&mut self, draft: NewItem) -> LedgerResult<Item> {
        draft.validate()?;
        self.ensure_category_exists(draft.category_id)?;
        self.ensure_unit_exists(draft.unit_id)?;
        let seq = self.next_item_seq();
        let item = draft.into_item(ItemId::new(), codes::code(codes::ITEM_PREFIX, seq));
        self.counters.items = self.counters.items.max(seq);
        self.state.items.push(item.clone());
        self.record(
            AuditAction::Create,
            "Item",
            format!("Added item {}", item.name),
        );
        self.persist();
        Ok(item)
    }

    /// Replace the item with the matching id. A missing id is a no-op.
    ///
    /// `current_stock` and `code` are ledger-owned: whatever the caller
    /// supplies in those fields is discarded in favor of the stored
    /// values. Stock only ever moves through bills.
    pub fn update_item(&mut self, item: Item) -> LedgerResult<()> {
        item.validate()?;
        self.ensure_category_exists(item.category_id)?;
        self.ensure_unit_exists(item.unit_id)?;
        let Some(stored) = self.state.items.iter_mut().find(|it| it.id == item.id) else {
            return Ok(());
        };
        let code = stored.code.clone();
        let current_stock = stored.current_stock;
        *stored = Item {
            code,
            current_stock,
            ..item
        };
        let name = stored.name.clone();
        self.record(AuditAction::Edit, "Item", format!("Updated item {name}"));
        self.persist();
        Ok(())
    }

    /// Remove an item, unless any bill (purchase or sales) references it.
    pub fn delete_item(&mut self, id: ItemId) -> LedgerResult<()> {
        let in_purchases = self
            .state
            .purchase_bills
            .iter()
            .any(|b| b.items.iter().any(|line| line.item_id == id));
        let in_sales = self
            .state
            .sales_bills
            .iter()
            .any(|b| b.items.iter().any(|line| line.item_id == id));
        if in_purchases || in_sales {
            return Err(LedgerError::referential(
                "cannot delete item with existing stock transactions",
            ));
        }
        let Some(pos) = self.state.items.iter().position(|it| it.id == id) else {
            return Err(LedgerError::not_found(format!("item {id}")));
        };
        let item = self.state.items.remove(pos);
        self.record(
            AuditAction::Delete,
            "Item",
            format!("Deleted item {}", item.name),
        );
        self.persist();
        Ok(())
    }

    // ---- categories & units (append-only) ---------------------------------

    pub fn add_category(&mut self, name: impl Into<String>) -> LedgerResult<Category> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LedgerError::validation("category name cannot be empty"));
        }
        let category = Category {
            id: CategoryId::new(),
            name,
        };
        self.state.categories.push(category.clone());
        self.record(
            AuditAction::Create,
            "Category",
            format!("Added category {}", category.name),
        );
        self.persist();
        Ok(category)
    }

    pub fn add_unit(&mut self, name: impl Into<String>) -> LedgerResult<Unit> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LedgerError::validation("unit name cannot be empty"));
        }
        let unit = Unit {
            id: UnitId::new(),
            name,
        };
        self.state.units.push(unit.clone());
        self.record(
            AuditAction::Create,
            "Unit",
            format!("Added unit {}", unit.name),
        );
        self.persist();
        Ok(unit)
    }

    // ---- purchase bills ----------------------------------------------------

    /// Create a purchase bill: stock flows in, sale prices may be
    /// overwritten, totals/balance/status are derived by the engine.
    pub fn create_purchase(&mut self, draft: PurchaseDraft) -> LedgerResult<PurchaseBill> {
        self.ensure_vendor_exists(draft.vendor_id)?;
        self.ensure_items_exist(&draft.items)?;
        let deltas = stock::line_deltas(&draft.items, 1);
        stock::check_policy(self.config.stock_policy, &self.state.items, &deltas)?;

        let year = draft.date.year();
        let seq = self.next_invoice_seq(BillKind::Purchase, year);
        let invoice_no = codes::invoice_no(BillKind::Purchase, year, seq);
        let sale_prices = draft.item_sale_prices.clone();
        let bill = draft.into_bill(BillId::new(), invoice_no)?;

        stock::apply_lines(&mut self.state.items, &bill.items, 1, Some(&sale_prices));
        self.state.purchase_bills.push(bill.clone());
        self.counters.note_invoice(BillKind::Purchase, year, seq);
        self.record(
            AuditAction::Create,
            "Purchase",
            format!("Created bill {}", bill.invoice_no),
        );
        self.persist();
        tracing::info!(invoice = %bill.invoice_no, total = bill.total_amount, "purchase bill created");
        Ok(bill)
    }

    /// Edit a purchase bill via retract-then-reapply: the old bill's
    /// stock effect is fully undone before the new version is applied,
    /// so lines may be added, removed, or requantified freely.
    pub fn update_purchase(
        &mut self,
        bill: PurchaseBill,
        sale_prices: SalePriceMap,
    ) -> LedgerResult<PurchaseBill> {
        let Some(pos) = self
            .state
            .purchase_bills
            .iter()
            .position(|b| b.id == bill.id)
        else {
            return Err(LedgerError::not_found(format!("purchase bill {}", bill.id)));
        };
        self.ensure_vendor_exists(bill.vendor_id)?;
        self.ensure_items_exist(&bill.items)?;

        let old_lines = self.state.purchase_bills[pos].items.clone();
        let mut deltas = stock::line_deltas(&bill.items, 1);
        stock::merge_deltas(&mut deltas, stock::line_deltas(&old_lines, -1));
        stock::check_policy(self.config.stock_policy, &self.state.items, &deltas)?;

        // Invoice numbers are assigned at creation and never change.
        let invoice_no = self.state.purchase_bills[pos].invoice_no.clone();
        let mut updated = PurchaseBill { invoice_no, ..bill };
        updated.recompute()?;

        stock::apply_lines(&mut self.state.items, &old_lines, -1, None);
        stock::apply_lines(&mut self.state.items, &updated.items, 1, Some(&sale_prices));
        self.state.purchase_bills[pos] = updated.clone();
        self.record(
            AuditAction::Edit,
            "Purchase",
            format!("Updated bill {}", updated.invoice_no),
        );
        self.persist();
        Ok(updated)
    }

    /// Delete a purchase bill, retracting its stock effect.
    pub fn delete_purchase(&mut self, id: BillId) -> LedgerResult<()> {
        let Some(pos) = self.state.purchase_bills.iter().position(|b| b.id == id) else {
            return Err(LedgerError::not_found(format!("purchase bill {id}")));
        };
        let deltas = stock::line_deltas(&self.state.purchase_bills[pos].items, -1);
        stock::check_policy(self.config.stock_policy, &self.state.items, &deltas)?;

        let bill = self.state.purchase_bills.remove(pos);
        stock::apply_lines(&mut self.state.items, &bill.items, -1, None);
        self.record(
            AuditAction::Delete,
            "Purchase",
            format!("Deleted bill {}", bill.invoice_no),
        );
        self.persist();
        Ok(())
    }

    // ---- sales bills -------------------------------------------------------

    /// Create a sales/issue bill: stock flows out (possibly below zero,
    /// per the configured policy), amounts and status are derived.
    pub fn create_sales(&mut self, draft: SalesDraft) -> LedgerResult<SalesBill> {
        self.ensure_items_exist(&draft.items)?;
        let deltas = stock::line_deltas(&draft.items, -1);
        stock::check_policy(self.config.stock_policy, &self.state.items, &deltas)?;

        let year = draft.date.year();
        let seq = self.next_invoice_seq(BillKind::Sales, year);
        let invoice_no = codes::invoice_no(BillKind::Sales, year, seq);
        let bill = draft.into_bill(BillId::new(), invoice_no)?;

        stock::apply_lines(&mut self.state.items, &bill.items, -1, None);
        self.state.sales_bills.push(bill.clone());
        self.counters.note_invoice(BillKind::Sales, year, seq);
        self.record(
            AuditAction::Create,
            "Sales",
            format!("Issued bill {}", bill.invoice_no),
        );
        self.persist();
        tracing::info!(invoice = %bill.invoice_no, total = bill.final_amount, "sales bill issued");
        Ok(bill)
    }

    /// Edit a sales bill via retract-then-reapply (old stock returns,
    /// new stock leaves).
    pub fn update_sales(&mut self, bill: SalesBill) -> LedgerResult<SalesBill> {
        let Some(pos) = self.state.sales_bills.iter().position(|b| b.id == bill.id) else {
            return Err(LedgerError::not_found(format!("sales bill {}", bill.id)));
        };
        self.ensure_items_exist(&bill.items)?;

        let old_lines = self.state.sales_bills[pos].items.clone();
        let mut deltas = stock::line_deltas(&bill.items, -1);
        stock::merge_deltas(&mut deltas, stock::line_deltas(&old_lines, 1));
        stock::check_policy(self.config.stock_policy, &self.state.items, &deltas)?;

        let invoice_no = self.state.sales_bills[pos].invoice_no.clone();
        let mut updated = SalesBill { invoice_no, ..bill };
        updated.recompute()?;

        stock::apply_lines(&mut self.state.items, &old_lines, 1, None);
        stock::apply_lines(&mut self.state.items, &updated.items, -1, None);
        self.state.sales_bills[pos] = updated.clone();
        self.record(
            AuditAction::Edit,
            "Sales",
            format!("Updated bill {}", updated.invoice_no),
        );
        self.persist();
        Ok(updated)
    }

    /// Delete a sales bill; its stock returns to the shelf.
    pub fn delete_sales(&mut self, id: BillId) -> LedgerResult<()> {
        let Some(pos) = self.state.sales_bills.iter().position(|b| b.id == id) else {
            return Err(LedgerError::not_found(format!("sales bill {id}")));
        };
        let bill = self.state.sales_bills.remove(pos);
        stock::apply_lines(&mut self.state.items, &bill.items, 1, None);
        self.record(
            AuditAction::Delete,
            "Sales",
            format!("Deleted bill {}", bill.invoice_no),
        );
        self.persist();
        Ok(())
    }

    // ---- aggregation queries -----------------------------------------------

    /// Items at or below their minimum stock level.
    pub fn low_stock_items(&self) -> Vec<&Item> {
        self.state
            .items
            .iter()
            .filter(|it| it.is_low_stock())
            .collect()
    }

    /// Outstanding amount owed to us across all sales bills.
    pub fn total_receivables(&self) -> i64 {
        self.state
            .sales_bills
            .iter()
            .map(|b| b.balance_amount)
            .sum()
    }

    /// Outstanding amount we owe across all purchase bills.
    pub fn total_payables(&self) -> i64 {
        self.state
            .purchase_bills
            .iter()
            .map(|b| b.balance_amount)
            .sum()
    }

    // ---- internals ---------------------------------------------------------

    fn ensure_vendor_exists(&self, id: VendorId) -> LedgerResult<()> {
        if self.state.vendors.iter().any(|v| v.id == id) {
            Ok(())
        } else {
            Err(LedgerError::validation(format!(
                "bill references unknown vendor {id}"
            )))
        }
    }

    fn ensure_items_exist(&self, lines: &[BillItem]) -> LedgerResult<()> {
        for line in lines {
            if !self.state.items.iter().any(|it| it.id == line.item_id) {
                return Err(LedgerError::validation(format!(
                    "bill references unknown item {}",
                    line.item_id
                )));
            }
        }
        Ok(())
    }

    fn ensure_category_exists(&self, id: CategoryId) -> LedgerResult<()> {
        if self.state.categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(LedgerError::validation(format!(
                "item references unknown category {id}"
            )))
        }
    }

    fn ensure_unit_exists(&self, id: UnitId) -> LedgerResult<()> {
        if self.state.units.iter().any(|u| u.id == id) {
            Ok(())
        } else {
            Err(LedgerError::validation(format!(
                "item references unknown unit {id}"
            )))
        }
    }

    fn next_vendor_seq(&self) -> u32 {
        match self.config.numbering {
            Numbering::LengthBased => self.state.vendors.len() as u32 + 1,
            Numbering::Monotonic => self.counters.vendors + 1,
        }
    }

    fn next_item_seq(&self) -> u32 {
        match self.config.numbering {
            Numbering::LengthBased => self.state.items.len() as u32 + 1,
            Numbering::Monotonic => self.counters.items + 1,
        }
    }

    fn next_invoice_seq(&self, kind: BillKind, year: i32) -> u32 {
        match self.config.numbering {
            Numbering::LengthBased => {
                let bills_for_year = match kind {
                    BillKind::Purchase => self
                        .state
                        .purchase_bills
                        .iter()
                        .filter(|b| codes::invoice_sequence(&b.invoice_no, kind, year).is_some())
                        .count(),
                    BillKind::Sales => self
                        .state
                        .sales_bills
                        .iter()
                        .filter(|b| codes::invoice_sequence(&b.invoice_no, kind, year).is_some())
                        .count(),
                };
                bills_for_year as u32 + 1
            }
            Numbering::Monotonic => self.counters.invoices.get(&(kind, year)).copied().unwrap_or(0) + 1,
        }
    }

    fn record(&mut self, action: AuditAction, module: &str, details: String) {
        audit::record(&mut self.state.logs, &self.config.actor, action, module, details);
    }

    /// Hand the snapshot to the gateway, fire-and-forget. A failed save
    /// leaves the in-memory state ahead of storage; the gap is logged,
    /// never surfaced to the operation caller.
    fn persist(&self) {
        if let Err(err) = self.store.save(&self.state) {
            tracing::warn!(error = %err, "snapshot save failed; in-memory state is ahead of storage");
        }
    }
}
