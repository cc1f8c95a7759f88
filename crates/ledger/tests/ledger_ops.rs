//! Black-box tests of the ledger service through its public interface,
//! backed by the in-memory gateway.

use std::sync::Arc;

use chrono::NaiveDate;

use dvhs_billing::{
    BillItem, IssuedToType, PaymentMode, PaymentStatus, PurchaseDraft, SalePriceMap, SalesDraft,
};
use dvhs_catalog::{ItemType, NewItem, NewVendor, PaymentTerm};
use dvhs_core::codes::Numbering;
use dvhs_core::{CategoryId, ItemId, LedgerError, UnitId, VendorId};
use dvhs_ledger::{AuditAction, InMemoryStore, Ledger, LedgerConfig, StockPolicy};

fn open_ledger() -> (Ledger<Arc<InMemoryStore>>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let ledger = Ledger::open(Arc::clone(&store)).unwrap();
    (ledger, store)
}

fn open_with(config: LedgerConfig) -> Ledger<Arc<InMemoryStore>> {
    Ledger::with_config(Arc::new(InMemoryStore::new()), config).unwrap()
}

fn vendor_draft(name: &str) -> NewVendor {
    NewVendor {
        name: name.to_string(),
        contact_person: "Clerk".to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "9000000000".to_string(),
        address: "Market Road".to_string(),
        gst_no: None,
        payment_terms: PaymentTerm::Immediate,
        bank_name: None,
        ifsc_code: None,
        account_number: None,
        upi_id: None,
    }
}

fn item_draft(name: &str, category_id: CategoryId, unit_id: UnitId, min_stock: i64) -> NewItem {
    NewItem {
        name: name.to_string(),
        category_id,
        unit_id,
        item_type: ItemType::Consumable,
        default_location: "Store Room".to_string(),
        min_stock_level: min_stock,
        sale_price: 0,
    }
}

fn purchase_draft(vendor_id: VendorId, lines: Vec<BillItem>, paid: i64) -> PurchaseDraft {
    PurchaseDraft {
        date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        vendor_id,
        payment_term: PaymentTerm::Immediate,
        payment_mode: PaymentMode::Cash,
        items: lines,
        paid_amount: paid,
        remarks: String::new(),
        bank_name: None,
        ifsc_code: None,
        upi_id: None,
        item_sale_prices: SalePriceMap::new(),
    }
}

fn sales_draft(lines: Vec<BillItem>, discount: i64, paid: i64) -> SalesDraft {
    SalesDraft {
        date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
        issued_to: "Class 10B".to_string(),
        issued_to_type: IssuedToType::Student,
        other_recipient_name: None,
        items: lines,
        discount,
        paid_amount: paid,
        payment_mode: PaymentMode::Cash,
        bank_name: None,
        upi_id: None,
        remarks: String::new(),
    }
}

/// Seed a vendor and one item; returns (ledger, store, vendor_id, item_id).
fn seeded() -> (
    Ledger<Arc<InMemoryStore>>,
    Arc<InMemoryStore>,
    VendorId,
    ItemId,
) {
    let (mut ledger, store) = open_ledger();
    let vendor = ledger.add_vendor(vendor_draft("Sharma Stationers")).unwrap();
    let category_id = ledger.categories()[0].id;
    let unit_id = ledger.units()[0].id;
    let item = ledger
        .add_item(item_draft("A4 Notebook", category_id, unit_id, 10))
        .unwrap();
    (ledger, store, vendor.id, item.id)
}

#[test]
fn fresh_ledger_is_seeded_with_reference_tables() {
    let (ledger, _) = open_ledger();
    let names: Vec<&str> = ledger.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        ["Stationery", "Electronics", "Furniture", "Lab Equipment"]
    );
    let units: Vec<&str> = ledger.units().iter().map(|u| u.name.as_str()).collect();
    assert_eq!(units, ["Pcs", "Kg", "Box", "Set"]);
}

#[test]
fn purchase_then_oversell_then_delete_restores_stock() {
    let (mut ledger, _, vendor_id, item_id) = seeded();

    // Purchase 15 @ 100, fully paid.
    let bill = ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(item_id, 15, 100)],
            1_500,
        ))
        .unwrap();
    assert_eq!(bill.total_amount, 1_500);
    assert_eq!(bill.balance_amount, 0);
    assert_eq!(bill.payment_status, PaymentStatus::Paid);
    assert_eq!(ledger.items()[0].current_stock, 15);

    // Issue 20 @ 120 against 15 in stock: permitted, stock goes negative.
    let sale = ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 20, 120)], 0, 0))
        .unwrap();
    assert_eq!(sale.total_amount, 2_400);
    assert_eq!(sale.final_amount, 2_400);
    assert_eq!(sale.balance_amount, 2_400);
    assert_eq!(sale.payment_status, PaymentStatus::Unpaid);
    assert_eq!(ledger.items()[0].current_stock, -5);

    // Deleting the sale returns its stock.
    ledger.delete_sales(sale.id).unwrap();
    assert_eq!(ledger.items()[0].current_stock, 15);
}

#[test]
fn editing_a_purchase_retracts_before_reapplying() {
    let (mut ledger, _, vendor_id, item_a) = seeded();
    let category_id = ledger.categories()[0].id;
    let unit_id = ledger.units()[0].id;
    let item_b = ledger
        .add_item(item_draft("Whiteboard Marker", category_id, unit_id, 0))
        .unwrap()
        .id;

    let bill = ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(item_a, 5, 100)],
            0,
        ))
        .unwrap();
    assert_eq!(stock_of(&ledger, item_a), 5);

    // Requantify A and introduce B in the same edit.
    let mut edited = bill.clone();
    edited.items = vec![BillItem::new(item_a, 2, 100), BillItem::new(item_b, 3, 50)];
    ledger.update_purchase(edited, SalePriceMap::new()).unwrap();

    assert_eq!(stock_of(&ledger, item_a), 2);
    assert_eq!(stock_of(&ledger, item_b), 3);

    let stored = &ledger.purchase_bills()[0];
    assert_eq!(stored.total_amount, 350);
    assert_eq!(stored.balance_amount, 350);
}

fn stock_of(ledger: &Ledger<Arc<InMemoryStore>>, id: ItemId) -> i64 {
    ledger
        .items()
        .iter()
        .find(|it| it.id == id)
        .unwrap()
        .current_stock
}

#[test]
fn purchase_can_overwrite_item_sale_prices() {
    let (mut ledger, _, vendor_id, item_id) = seeded();
    let mut draft = purchase_draft(vendor_id, vec![BillItem::new(item_id, 10, 80)], 0);
    draft.item_sale_prices.insert(item_id, 95);

    ledger.create_purchase(draft).unwrap();
    assert_eq!(ledger.items()[0].sale_price, 95);
}

#[test]
fn referenced_vendor_cannot_be_deleted() {
    let (mut ledger, _, vendor_id, item_id) = seeded();
    ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(item_id, 1, 10)],
            0,
        ))
        .unwrap();

    let before = ledger.snapshot().clone();
    let err = ledger.delete_vendor(vendor_id).unwrap_err();
    assert!(matches!(err, LedgerError::ReferentialIntegrity(_)));
    assert_eq!(ledger.snapshot(), &before);
}

#[test]
fn referenced_item_cannot_be_deleted() {
    let (mut ledger, _, _, item_id) = seeded();
    ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 1, 10)], 0, 0))
        .unwrap();

    let before = ledger.snapshot().clone();
    let err = ledger.delete_item(item_id).unwrap_err();
    assert!(matches!(err, LedgerError::ReferentialIntegrity(_)));
    assert_eq!(ledger.snapshot(), &before);
}

#[test]
fn bills_against_unknown_references_are_rejected_without_effects() {
    let (mut ledger, _, vendor_id, item_id) = seeded();
    let before = ledger.snapshot().clone();

    let err = ledger
        .create_purchase(purchase_draft(
            VendorId::new(),
            vec![BillItem::new(item_id, 1, 10)],
            0,
        ))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(ItemId::new(), 1, 10)],
            0,
        ))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    assert_eq!(ledger.snapshot(), &before);
}

#[test]
fn length_based_numbering_reuses_sequences_after_deletion() {
    let (mut ledger, _, vendor_id, item_id) = seeded();
    let line = || vec![BillItem::new(item_id, 1, 10)];

    let first = ledger
        .create_purchase(purchase_draft(vendor_id, line(), 0))
        .unwrap();
    let second = ledger
        .create_purchase(purchase_draft(vendor_id, line(), 0))
        .unwrap();
    assert_eq!(first.invoice_no, "DVHS-PUR-2026-0001");
    assert_eq!(second.invoice_no, "DVHS-PUR-2026-0002");

    // Deleting the second bill shrinks the collection, so the next bill
    // is handed the same number again. This reuse is the documented
    // behavior of the default scheme, not a defect to fix.
    ledger.delete_purchase(second.id).unwrap();
    let third = ledger
        .create_purchase(purchase_draft(vendor_id, line(), 0))
        .unwrap();
    assert_eq!(third.invoice_no, "DVHS-PUR-2026-0002");
}

#[test]
fn monotonic_numbering_never_reuses_sequences() {
    let mut ledger = open_with(LedgerConfig {
        numbering: Numbering::Monotonic,
        ..LedgerConfig::default()
    });
    let vendor_id = ledger.add_vendor(vendor_draft("Sharma Stationers")).unwrap().id;
    let category_id = ledger.categories()[0].id;
    let unit_id = ledger.units()[0].id;
    let item_id = ledger
        .add_item(item_draft("A4 Notebook", category_id, unit_id, 0))
        .unwrap()
        .id;
    let line = || vec![BillItem::new(item_id, 1, 10)];

    let first = ledger
        .create_purchase(purchase_draft(vendor_id, line(), 0))
        .unwrap();
    let second = ledger
        .create_purchase(purchase_draft(vendor_id, line(), 0))
        .unwrap();
    ledger.delete_purchase(second.id).unwrap();
    let third = ledger
        .create_purchase(purchase_draft(vendor_id, line(), 0))
        .unwrap();

    assert_eq!(first.invoice_no, "DVHS-PUR-2026-0001");
    assert_eq!(third.invoice_no, "DVHS-PUR-2026-0003");
}

#[test]
fn invoice_sequences_are_tracked_per_year() {
    let (mut ledger, _, vendor_id, item_id) = seeded();
    let line = || vec![BillItem::new(item_id, 1, 10)];

    let mut draft = purchase_draft(vendor_id, line(), 0);
    draft.date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    let late = ledger.create_purchase(draft).unwrap();

    let mut draft = purchase_draft(vendor_id, line(), 0);
    draft.date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let early = ledger.create_purchase(draft).unwrap();

    assert_eq!(late.invoice_no, "DVHS-PUR-2025-0001");
    assert_eq!(early.invoice_no, "DVHS-PUR-2026-0001");
}

#[test]
fn engine_recomputes_forged_amounts_and_status_on_update() {
    let (mut ledger, _, _, item_id) = seeded();
    let sale = ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 2, 100)], 0, 0))
        .unwrap();

    let mut forged = sale.clone();
    forged.payment_status = PaymentStatus::Paid;
    forged.total_amount = 0;
    forged.final_amount = 0;
    forged.balance_amount = 0;
    forged.items[0].total = 1;
    forged.invoice_no = "DVHS-SAL-2026-9999".to_string();

    let stored = ledger.update_sales(forged).unwrap();
    assert_eq!(stored.total_amount, 200);
    assert_eq!(stored.final_amount, 200);
    assert_eq!(stored.balance_amount, 200);
    assert_eq!(stored.payment_status, PaymentStatus::Unpaid);
    assert_eq!(stored.items[0].total, 200);
    // Invoice numbers are creation-assigned and cannot be forged either.
    assert_eq!(stored.invoice_no, sale.invoice_no);
}

#[test]
fn updating_an_absent_vendor_is_a_silent_noop() {
    let (mut ledger, _, vendor_id, _) = seeded();
    let logs_before = ledger.logs().len();

    let mut ghost = ledger.vendors()[0].clone();
    ghost.id = VendorId::new();
    ghost.name = "Ghost Vendor".to_string();
    ledger.update_vendor(ghost).unwrap();

    assert_eq!(ledger.vendors().len(), 1);
    assert_eq!(ledger.vendors()[0].id, vendor_id);
    assert_eq!(ledger.logs().len(), logs_before);
}

#[test]
fn updating_a_missing_bill_is_not_found() {
    let (mut ledger, _, _, item_id) = seeded();
    let sale = ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 1, 10)], 0, 0))
        .unwrap();
    ledger.delete_sales(sale.id).unwrap();

    let err = ledger.update_sales(sale).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[test]
fn item_updates_cannot_touch_stock_or_code() {
    let (mut ledger, _, vendor_id, item_id) = seeded();
    ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(item_id, 8, 10)],
            0,
        ))
        .unwrap();

    let mut edited = ledger.items()[0].clone();
    edited.name = "A4 Notebook (ruled)".to_string();
    edited.current_stock = 9_999;
    edited.code = "ITM-7777".to_string();
    ledger.update_item(edited).unwrap();

    let item = &ledger.items()[0];
    assert_eq!(item.name, "A4 Notebook (ruled)");
    assert_eq!(item.current_stock, 8);
    assert_eq!(item.code, "ITM-0001");
}

#[test]
fn reject_policy_blocks_oversell_without_effects() {
    let mut ledger = open_with(LedgerConfig {
        stock_policy: StockPolicy::Reject,
        ..LedgerConfig::default()
    });
    let vendor_id = ledger.add_vendor(vendor_draft("Sharma Stationers")).unwrap().id;
    let category_id = ledger.categories()[0].id;
    let unit_id = ledger.units()[0].id;
    let item_id = ledger
        .add_item(item_draft("A4 Notebook", category_id, unit_id, 0))
        .unwrap()
        .id;
    ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(item_id, 5, 10)],
            0,
        ))
        .unwrap();

    let before = ledger.snapshot().clone();
    let err = ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 6, 10)], 0, 0))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(ledger.snapshot(), &before);

    // Selling exactly what is on the shelf is still fine.
    ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 5, 10)], 0, 0))
        .unwrap();
    assert_eq!(ledger.items()[0].current_stock, 0);
}

#[test]
fn every_mutation_is_audited_most_recent_first() {
    let (mut ledger, _, _, item_id) = seeded();
    ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 1, 10)], 0, 0))
        .unwrap();

    let logs = ledger.logs();
    assert_eq!(logs.len(), 3); // vendor, item, sale
    assert_eq!(logs[0].action, AuditAction::Create);
    assert_eq!(logs[0].module, "Sales");
    assert_eq!(logs[0].details, "Issued bill DVHS-SAL-2026-0001");
    assert_eq!(logs[1].module, "Item");
    assert_eq!(logs[2].module, "Vendor");
    assert_eq!(logs[2].details, "Added vendor Sharma Stationers");
    assert!(logs.iter().all(|entry| entry.user == "Admin"));
}

#[test]
fn failed_operations_are_not_audited() {
    let (mut ledger, _, _, _) = seeded();
    let logs_before = ledger.logs().len();

    let _ = ledger
        .create_sales(sales_draft(vec![BillItem::new(ItemId::new(), 1, 10)], 0, 0))
        .unwrap_err();

    assert_eq!(ledger.logs().len(), logs_before);
}

#[test]
fn every_mutation_is_mirrored_to_the_gateway() {
    let (mut ledger, store, _, item_id) = seeded();
    ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 1, 10)], 0, 0))
        .unwrap();

    assert_eq!(store.persisted().as_ref(), Some(ledger.snapshot()));
}

#[test]
fn a_reopened_ledger_sees_the_persisted_state() {
    let (mut ledger, store, vendor_id, item_id) = seeded();
    ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(item_id, 3, 10)],
            0,
        ))
        .unwrap();
    let snapshot = ledger.snapshot().clone();
    drop(ledger);

    let reopened = Ledger::open(Arc::clone(&store)).unwrap();
    assert_eq!(reopened.snapshot(), &snapshot);
    assert_eq!(reopened.items()[0].current_stock, 3);
}

#[test]
fn read_accessors_are_idempotent() {
    let (mut ledger, _, vendor_id, item_id) = seeded();
    ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(item_id, 3, 10)],
            0,
        ))
        .unwrap();

    assert_eq!(ledger.items(), ledger.items());
    assert_eq!(ledger.purchase_bills(), ledger.purchase_bills());
    assert_eq!(ledger.logs(), ledger.logs());
}

#[test]
fn dashboard_aggregations() {
    let (mut ledger, _, vendor_id, item_id) = seeded();

    // Item has min_stock_level 10 and zero stock: low.
    assert_eq!(ledger.low_stock_items().len(), 1);

    ledger
        .create_purchase(purchase_draft(
            vendor_id,
            vec![BillItem::new(item_id, 20, 100)],
            500,
        ))
        .unwrap();
    assert!(ledger.low_stock_items().is_empty());
    assert_eq!(ledger.total_payables(), 1_500);

    ledger
        .create_sales(sales_draft(vec![BillItem::new(item_id, 2, 150)], 50, 100))
        .unwrap();
    assert_eq!(ledger.total_receivables(), 150);
}

#[test]
fn categories_and_units_are_append_only_additions() {
    let (mut ledger, _, _, _) = seeded();

    let category = ledger.add_category("Sports").unwrap();
    assert!(ledger.categories().iter().any(|c| c.id == category.id));

    let unit = ledger.add_unit("Litre").unwrap();
    assert!(ledger.units().iter().any(|u| u.id == unit.id));

    let err = ledger.add_category("   ").unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn items_require_known_category_and_unit() {
    let (mut ledger, _, _, _) = seeded();
    let unit_id = ledger.units()[0].id;

    let err = ledger
        .add_item(item_draft("Ghost Item", CategoryId::new(), unit_id, 0))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(ledger.items().len(), 1);
}

#[test]
fn vendor_codes_are_sequential() {
    let (mut ledger, _, _, _) = seeded();
    let second = ledger.add_vendor(vendor_draft("Verma Traders")).unwrap();
    assert_eq!(ledger.vendors()[0].code, "VND-0001");
    assert_eq!(second.code, "VND-0002");
}
