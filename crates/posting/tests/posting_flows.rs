//! Black-box tests of the posting orchestrators over the in-memory stores.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{NaiveDate, Utc};

use ledgerpost_core::{
    DocumentId, DocumentRef, DocumentType, ItemId, PostingError, PostingResult, TenantId,
    WarehouseId,
};
use ledgerpost_infra::{
    InMemoryChartOfAccounts, InMemoryJournalStore, InMemoryLedgerStore, verify_running_balance,
};
use ledgerpost_journal::{JournalStore, codes};
use ledgerpost_ledger::{LedgerStore, StockBalance, StockLedgerEntry, StockMovement};
use ledgerpost_posting::{
    AdjustmentLine, AdjustmentOutcome, ConsumedItem, InvoicePaymentReceived, PaymentMethod,
    PosCogsRequested, PosSaleCompleted, PostingService, SalesInvoicePosted,
    StockAdjustmentApproved,
};
use ledgerpost_valuation::CogsRequestLine;

type Service = PostingService<
    Arc<InMemoryLedgerStore>,
    Arc<InMemoryJournalStore>,
    Arc<InMemoryChartOfAccounts>,
>;

struct Fixture {
    tenant: TenantId,
    ledger: Arc<InMemoryLedgerStore>,
    journal: Arc<InMemoryJournalStore>,
    chart: Arc<InMemoryChartOfAccounts>,
    service: Service,
}

fn fixture() -> Fixture {
    ledgerpost_observability::init();
    let tenant = TenantId::new();
    let ledger = Arc::new(InMemoryLedgerStore::new());
    let journal = Arc::new(InMemoryJournalStore::new());
    let chart = Arc::new(InMemoryChartOfAccounts::new());
    chart.seed_defaults(tenant);
    let service = PostingService::new(
        Arc::clone(&ledger),
        Arc::clone(&journal),
        Arc::clone(&chart),
    );
    Fixture {
        tenant,
        ledger,
        journal,
        chart,
        service,
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

fn receive_stock(fx: &Fixture, item: ItemId, warehouse: WarehouseId, qty: f64, rate: f64) {
    fx.ledger
        .append(
            fx.tenant,
            StockMovement {
                item,
                warehouse,
                posted_at: Utc::now(),
                quantity_delta: qty,
                valuation_rate: rate,
                document: DocumentRef::new(DocumentType::Manual, DocumentId::new(), "GRN-1"),
                voucher_type: "Purchase Receipt".to_string(),
                voucher_no: "GRN-000001".to_string(),
            },
        )
        .unwrap();
}

fn line_amounts(fx: &Fixture, entry_id: ledgerpost_core::JournalEntryId) -> Vec<(String, f64, f64)> {
    let (_, lines) = fx.journal.get(fx.tenant, entry_id).unwrap().unwrap();
    lines
        .iter()
        .map(|l| (l.account_code.clone(), l.debit, l.credit))
        .collect()
}

#[test]
fn simple_sale_posts_ar_against_revenue() {
    let fx = fixture();
    let outcome = fx
        .service
        .post_sales_invoice(
            fx.tenant,
            SalesInvoicePosted {
                invoice_id: DocumentId::new(),
                invoice_code: "INV-0001".to_string(),
                customer_id: DocumentId::new(),
                posting_date: date(),
                total_amount: 1000.0,
            },
        )
        .unwrap();

    let entry = outcome.journal_entry().expect("posted");
    assert_eq!(entry.total_debit, 1000.0);
    assert_eq!(entry.total_credit, 1000.0);
    assert_eq!(
        line_amounts(&fx, entry.id),
        vec![
            (codes::ACCOUNTS_RECEIVABLE.to_string(), 1000.0, 0.0),
            (codes::SALES_REVENUE.to_string(), 0.0, 1000.0),
        ]
    );
}

#[test]
fn payment_moves_ar_to_cash() {
    let fx = fixture();
    let outcome = fx
        .service
        .post_invoice_payment(
            fx.tenant,
            InvoicePaymentReceived {
                payment_id: DocumentId::new(),
                invoice_id: DocumentId::new(),
                invoice_code: "INV-0001".to_string(),
                posting_date: date(),
                amount: 400.0,
                method: PaymentMethod::Card,
            },
        )
        .unwrap();

    let entry = outcome.journal_entry().expect("posted");
    assert_eq!(
        line_amounts(&fx, entry.id),
        vec![
            (codes::CASH.to_string(), 400.0, 0.0),
            (codes::ACCOUNTS_RECEIVABLE.to_string(), 0.0, 400.0),
        ]
    );
}

#[test]
fn discounted_pos_sale_balances_with_contra_revenue_leg() {
    let fx = fixture();
    let outcome = fx
        .service
        .post_pos_sale(
            fx.tenant,
            PosSaleCompleted {
                txn_id: DocumentId::new(),
                txn_code: "POS-0117".to_string(),
                posting_date: date(),
                subtotal: 100.0,
                discount: 10.0,
                tax: 9.0,
                total_amount: 99.0,
            },
        )
        .unwrap();

    let entry = outcome.journal_entry().expect("posted");
    assert_eq!(
        line_amounts(&fx, entry.id),
        vec![
            (codes::CASH.to_string(), 99.0, 0.0),
            (codes::SALES_DISCOUNT.to_string(), 10.0, 0.0),
            (codes::SALES_REVENUE.to_string(), 0.0, 100.0),
            (codes::SALES_TAX_PAYABLE.to_string(), 0.0, 9.0),
        ]
    );
    assert_eq!(entry.total_debit, entry.total_credit);
    assert_eq!(entry.total_debit, 109.0);
}

#[test]
fn fully_discounted_pos_sale_posts_without_a_cash_leg() {
    let fx = fixture();
    let outcome = fx
        .service
        .post_pos_sale(
            fx.tenant,
            PosSaleCompleted {
                txn_id: DocumentId::new(),
                txn_code: "POS-0119".to_string(),
                posting_date: date(),
                subtotal: 100.0,
                discount: 100.0,
                tax: 0.0,
                total_amount: 0.0,
            },
        )
        .unwrap();

    let entry = outcome.journal_entry().expect("posted");
    assert_eq!(
        line_amounts(&fx, entry.id),
        vec![
            (codes::SALES_DISCOUNT.to_string(), 100.0, 0.0),
            (codes::SALES_REVENUE.to_string(), 0.0, 100.0),
        ]
    );
}

#[test]
fn undiscounted_untaxed_pos_sale_has_two_legs() {
    let fx = fixture();
    let outcome = fx
        .service
        .post_pos_sale(
            fx.tenant,
            PosSaleCompleted {
                txn_id: DocumentId::new(),
                txn_code: "POS-0118".to_string(),
                posting_date: date(),
                subtotal: 55.0,
                discount: 0.0,
                tax: 0.0,
                total_amount: 55.0,
            },
        )
        .unwrap();

    let entry = outcome.journal_entry().expect("posted");
    assert_eq!(line_amounts(&fx, entry.id).len(), 2);
}

#[test]
fn cogs_for_two_units_at_rate_25() {
    let fx = fixture();
    let item = ItemId::new();
    let warehouse = WarehouseId::new();
    receive_stock(&fx, item, warehouse, 10.0, 25.0);

    let breakdown = fx
        .service
        .calculate_cogs(fx.tenant, &[CogsRequestLine { item, quantity: 2.0 }])
        .unwrap();
    assert_eq!(breakdown.total, 50.0);
    assert_eq!(breakdown.lines[0].rate, 25.0);

    let outcome = fx
        .service
        .post_pos_cogs(
            fx.tenant,
            PosCogsRequested {
                txn_id: DocumentId::new(),
                txn_code: "POS-0200".to_string(),
                posting_date: date(),
                items: vec![ConsumedItem {
                    item,
                    warehouse,
                    quantity: 2.0,
                }],
            },
        )
        .unwrap();

    let entry = outcome.journal_entry().expect("posted");
    assert_eq!(
        line_amounts(&fx, entry.id),
        vec![
            (codes::COST_OF_GOODS_SOLD.to_string(), 50.0, 0.0),
            (codes::INVENTORY.to_string(), 0.0, 50.0),
        ]
    );

    let entries = fx.ledger.entries_for_pair(fx.tenant, item, warehouse);
    let last = entries.last().unwrap();
    assert_eq!(last.quantity_delta, -2.0);
    assert_eq!(last.quantity_after, 8.0);
    verify_running_balance(&entries).unwrap();
}

#[test]
fn missing_cogs_account_fails_fast_with_named_error() {
    let fx = fixture();
    fx.chart.remove(fx.tenant, codes::COST_OF_GOODS_SOLD);
    let txn_id = DocumentId::new();

    let err = fx
        .service
        .post_pos_cogs(
            fx.tenant,
            PosCogsRequested {
                txn_id,
                txn_code: "POS-0300".to_string(),
                posting_date: date(),
                items: vec![ConsumedItem {
                    item: ItemId::new(),
                    warehouse: WarehouseId::new(),
                    quantity: 1.0,
                }],
            },
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Cost of Goods Sold account (C-5000) not found"
    );
    assert!(matches!(err, PostingError::Configuration(_)));
    assert!(fx.journal.find_by_document(fx.tenant, txn_id).unwrap().is_empty());
}

#[test]
fn zero_cogs_is_skipped_without_any_entries() {
    let fx = fixture();
    let item = ItemId::new(); // no ledger history, no cost source: rate 0
    let txn_id = DocumentId::new();

    let outcome = fx
        .service
        .post_pos_cogs(
            fx.tenant,
            PosCogsRequested {
                txn_id,
                txn_code: "POS-0400".to_string(),
                posting_date: date(),
                items: vec![ConsumedItem {
                    item,
                    warehouse: WarehouseId::new(),
                    quantity: 3.0,
                }],
            },
        )
        .unwrap();

    assert!(outcome.is_skipped());
    assert!(fx.journal.find_by_document(fx.tenant, txn_id).unwrap().is_empty());
    assert!(fx.ledger.entries_for_document(fx.tenant, txn_id).unwrap().is_empty());
}

#[test]
fn zero_net_adjustment_is_skipped_without_any_entries() {
    let fx = fixture();
    let adjustment_id = DocumentId::new();

    let outcome = fx
        .service
        .post_stock_adjustment(
            fx.tenant,
            StockAdjustmentApproved {
                adjustment_id,
                adjustment_code: "ADJ-0001".to_string(),
                posting_date: date(),
                items: vec![AdjustmentLine {
                    item: ItemId::new(),
                    warehouse: WarehouseId::new(),
                    quantity_delta: 0.0,
                }],
            },
        )
        .unwrap();

    assert!(outcome.is_skipped());
    assert!(fx.journal.find_by_document(fx.tenant, adjustment_id).unwrap().is_empty());
    assert!(fx.ledger.entries_for_document(fx.tenant, adjustment_id).unwrap().is_empty());
}

#[test]
fn shrinkage_adjustment_expenses_the_loss() {
    let fx = fixture();
    let item = ItemId::new();
    let warehouse = WarehouseId::new();
    receive_stock(&fx, item, warehouse, 20.0, 4.0);

    let outcome = fx
        .service
        .post_stock_adjustment(
            fx.tenant,
            StockAdjustmentApproved {
                adjustment_id: DocumentId::new(),
                adjustment_code: "ADJ-0002".to_string(),
                posting_date: date(),
                items: vec![AdjustmentLine {
                    item,
                    warehouse,
                    quantity_delta: -5.0,
                }],
            },
        )
        .unwrap();

    let AdjustmentOutcome::Posted {
        voucher_no,
        journal_entry: Some(entry),
    } = outcome
    else {
        panic!("expected posted adjustment with journal entry");
    };
    assert_eq!(voucher_no, "STK-000001");
    assert_eq!(
        line_amounts(&fx, entry.id),
        vec![
            (codes::COST_OF_GOODS_SOLD.to_string(), 20.0, 0.0),
            (codes::INVENTORY.to_string(), 0.0, 20.0),
        ]
    );

    let balance = fx
        .service
        .latest_stock_balance(fx.tenant, item, warehouse)
        .unwrap();
    assert_eq!(balance.quantity, 15.0);
}

#[test]
fn found_stock_adjustment_credits_cogs() {
    let fx = fixture();
    let item = ItemId::new();
    let warehouse = WarehouseId::new();
    receive_stock(&fx, item, warehouse, 8.0, 10.0);

    let outcome = fx
        .service
        .post_stock_adjustment(
            fx.tenant,
            StockAdjustmentApproved {
                adjustment_id: DocumentId::new(),
                adjustment_code: "ADJ-0003".to_string(),
                posting_date: date(),
                items: vec![AdjustmentLine {
                    item,
                    warehouse,
                    quantity_delta: 3.0,
                }],
            },
        )
        .unwrap();

    let AdjustmentOutcome::Posted {
        journal_entry: Some(entry),
        ..
    } = outcome
    else {
        panic!("expected posted adjustment with journal entry");
    };
    assert_eq!(
        line_amounts(&fx, entry.id),
        vec![
            (codes::INVENTORY.to_string(), 30.0, 0.0),
            (codes::COST_OF_GOODS_SOLD.to_string(), 0.0, 30.0),
        ]
    );
}

#[test]
fn pos_reversal_mirrors_sale_and_restores_stock() {
    let fx = fixture();
    let item = ItemId::new();
    let warehouse = WarehouseId::new();
    receive_stock(&fx, item, warehouse, 10.0, 25.0);

    let txn_id = DocumentId::new();
    fx.service
        .post_pos_sale(
            fx.tenant,
            PosSaleCompleted {
                txn_id,
                txn_code: "POS-0500".to_string(),
                posting_date: date(),
                subtotal: 100.0,
                discount: 10.0,
                tax: 9.0,
                total_amount: 99.0,
            },
        )
        .unwrap();
    fx.service
        .post_pos_cogs(
            fx.tenant,
            PosCogsRequested {
                txn_id,
                txn_code: "POS-0500".to_string(),
                posting_date: date(),
                items: vec![ConsumedItem {
                    item,
                    warehouse,
                    quantity: 2.0,
                }],
            },
        )
        .unwrap();

    let reversal = fx.service.reverse_pos_transaction(fx.tenant, txn_id).unwrap();
    assert_eq!(reversal.reversed_journals.len(), 2);
    assert_eq!(reversal.ledger_reversals, 1);

    // Every reversing entry mirrors its original exactly.
    let all = fx.journal.find_by_document(fx.tenant, txn_id).unwrap();
    assert_eq!(all.len(), 4);
    for reversed in &reversal.reversed_journals {
        let original = all
            .iter()
            .find(|(e, _)| reversed.description == format!("Reversal of {}", e.code))
            .expect("original present");
        let (_, original_lines) = original;
        let (_, reversed_lines) = fx.journal.get(fx.tenant, reversed.id).unwrap().unwrap();
        for (orig, rev) in original_lines.iter().zip(&reversed_lines) {
            assert_eq!(orig.debit, rev.credit);
            assert_eq!(orig.credit, rev.debit);
        }
    }

    // Stock is back where it started, through an offsetting entry.
    let balance = fx
        .service
        .latest_stock_balance(fx.tenant, item, warehouse)
        .unwrap();
    assert_eq!(balance.quantity, 10.0);
    let entries = fx.ledger.entries_for_pair(fx.tenant, item, warehouse);
    assert_eq!(entries.len(), 3);
    verify_running_balance(&entries).unwrap();
    assert_eq!(entries.last().unwrap().quantity_delta, 2.0);
}

#[test]
fn reversing_an_unknown_document_is_a_validation_error() {
    let fx = fixture();
    let err = fx
        .service
        .reverse_pos_transaction(fx.tenant, DocumentId::new())
        .unwrap_err();
    assert!(matches!(err, PostingError::Validation(_)));
}

/// Ledger wrapper that fails the nth append, then recovers (so rollback
/// offsets succeed).
struct FlakyLedger {
    inner: Arc<InMemoryLedgerStore>,
    appends_until_failure: AtomicI64,
}

impl LedgerStore for FlakyLedger {
    fn latest_balance(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: WarehouseId,
    ) -> PostingResult<StockBalance> {
        self.inner.latest_balance(tenant_id, item, warehouse)
    }

    fn latest_rate(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: Option<WarehouseId>,
    ) -> PostingResult<Option<f64>> {
        self.inner.latest_rate(tenant_id, item, warehouse)
    }

    fn append(
        &self,
        tenant_id: TenantId,
        movement: StockMovement,
    ) -> PostingResult<StockLedgerEntry> {
        if self.appends_until_failure.fetch_sub(1, Ordering::SeqCst) == 1 {
            return Err(PostingError::persistence("injected append failure"));
        }
        self.inner.append(tenant_id, movement)
    }

    fn entries_for_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<Vec<StockLedgerEntry>> {
        self.inner.entries_for_document(tenant_id, doc_id)
    }

    fn next_voucher_no(&self, tenant_id: TenantId) -> PostingResult<String> {
        self.inner.next_voucher_no(tenant_id)
    }
}

#[test]
fn ledger_failure_after_journal_rolls_the_posting_back() {
    let tenant = TenantId::new();
    let inner = Arc::new(InMemoryLedgerStore::new());
    let journal = Arc::new(InMemoryJournalStore::new());
    let chart = Arc::new(InMemoryChartOfAccounts::new());
    chart.seed_defaults(tenant);

    let item_a = ItemId::new();
    let item_b = ItemId::new();
    let warehouse = WarehouseId::new();
    for item in [item_a, item_b] {
        inner
            .append(
                tenant,
                StockMovement {
                    item,
                    warehouse,
                    posted_at: Utc::now(),
                    quantity_delta: 10.0,
                    valuation_rate: 5.0,
                    document: DocumentRef::new(DocumentType::Manual, DocumentId::new(), "GRN-1"),
                    voucher_type: "Purchase Receipt".to_string(),
                    voucher_no: "GRN-000001".to_string(),
                },
            )
            .unwrap();
    }

    // Seeding went through the inner store; the service sees the flaky
    // wrapper, which lets the first COGS append through and fails the second.
    let flaky = Arc::new(FlakyLedger {
        inner: Arc::clone(&inner),
        appends_until_failure: AtomicI64::new(2),
    });
    let service = PostingService::new(Arc::clone(&flaky), Arc::clone(&journal), chart);

    let txn_id = DocumentId::new();
    let err = service
        .post_pos_cogs(
            tenant,
            PosCogsRequested {
                txn_id,
                txn_code: "POS-0600".to_string(),
                posting_date: date(),
                items: vec![
                    ConsumedItem { item: item_a, warehouse, quantity: 2.0 },
                    ConsumedItem { item: item_b, warehouse, quantity: 3.0 },
                ],
            },
        )
        .unwrap_err();

    assert!(matches!(err, PostingError::Persistence(_)));
    // The journal was deleted and the one appended ledger entry was offset.
    assert!(journal.find_by_document(tenant, txn_id).unwrap().is_empty());
    let balance_a = inner.latest_balance(tenant, item_a, warehouse).unwrap();
    let balance_b = inner.latest_balance(tenant, item_b, warehouse).unwrap();
    assert_eq!(balance_a.quantity, 10.0);
    assert_eq!(balance_b.quantity, 10.0);
    verify_running_balance(&inner.entries_for_pair(tenant, item_a, warehouse)).unwrap();
}

#[test]
fn failed_value_neutral_adjustment_offsets_applied_entries() {
    let tenant = TenantId::new();
    let inner = Arc::new(InMemoryLedgerStore::new());
    let journal = Arc::new(InMemoryJournalStore::new());
    let chart = Arc::new(InMemoryChartOfAccounts::new());
    chart.seed_defaults(tenant);

    let item_a = ItemId::new();
    let item_b = ItemId::new();
    let warehouse = WarehouseId::new();
    for item in [item_a, item_b] {
        inner
            .append(
                tenant,
                StockMovement {
                    item,
                    warehouse,
                    posted_at: Utc::now(),
                    quantity_delta: 10.0,
                    valuation_rate: 5.0,
                    document: DocumentRef::new(DocumentType::Manual, DocumentId::new(), "GRN-1"),
                    voucher_type: "Purchase Receipt".to_string(),
                    voucher_no: "GRN-000001".to_string(),
                },
            )
            .unwrap();
    }

    // +5 A / -5 B at the same rate: zero net value, so no journal entry is
    // written. The wrapper lets the first append through and fails the second.
    let flaky = Arc::new(FlakyLedger {
        inner: Arc::clone(&inner),
        appends_until_failure: AtomicI64::new(2),
    });
    let service = PostingService::new(Arc::clone(&flaky), Arc::clone(&journal), chart);

    let adjustment_id = DocumentId::new();
    let err = service
        .post_stock_adjustment(
            tenant,
            StockAdjustmentApproved {
                adjustment_id,
                adjustment_code: "ADJ-0004".to_string(),
                posting_date: date(),
                items: vec![
                    AdjustmentLine { item: item_a, warehouse, quantity_delta: 5.0 },
                    AdjustmentLine { item: item_b, warehouse, quantity_delta: -5.0 },
                ],
            },
        )
        .unwrap_err();

    assert!(matches!(err, PostingError::Persistence(_)));
    // The applied entry for item A was offset; neither balance moved.
    let balance_a = inner.latest_balance(tenant, item_a, warehouse).unwrap();
    let balance_b = inner.latest_balance(tenant, item_b, warehouse).unwrap();
    assert_eq!(balance_a.quantity, 10.0);
    assert_eq!(balance_b.quantity, 10.0);
    assert!(journal.find_by_document(tenant, adjustment_id).unwrap().is_empty());
    verify_running_balance(&inner.entries_for_pair(tenant, item_a, warehouse)).unwrap();
}
