use ledgerpost_core::{
    DocumentId, DocumentRef, DocumentType, ItemId, PostingError, PostingResult, TenantId,
    WarehouseId, is_zero,
};
use ledgerpost_journal::{
    ChartOfAccounts, JournalDraft, JournalEngine, JournalEntry, JournalLine, JournalStore,
    SourceModule, codes, require_account,
};
use ledgerpost_ledger::{LedgerStore, StockBalance, StockLedgerEntry, StockMovement};
use ledgerpost_valuation::{
    CogsBreakdown, CogsRequestLine, ItemCostSource, NoCostSource, ValuationEngine,
};

use crate::outcome::{AdjustmentOutcome, PostingOutcome, ReversalOutcome};
use crate::requests::{
    InvoicePaymentReceived, PosCogsRequested, PosSaleCompleted, SalesInvoicePosted,
    StockAdjustmentApproved,
};

/// Translates business events into paired journal + ledger effects.
///
/// Every orchestrator follows one template: resolve accounts (fail fast),
/// compute valuation effects, build exactly-balanced lines, post the journal,
/// append ledger entries. A failure after the journal was written triggers
/// compensation: already-appended ledger entries are offset and the journal
/// is deleted, so no partial posting survives. A failure during compensation
/// is escalated as unrecoverable.
pub struct PostingService<L, J, C, K = NoCostSource> {
    ledger: L,
    chart: C,
    journal: JournalEngine<J, C>,
    valuation: ValuationEngine<L, K>,
}

impl<L, J, C> PostingService<L, J, C>
where
    L: LedgerStore + Clone,
    J: JournalStore,
    C: ChartOfAccounts + Clone,
{
    pub fn new(ledger: L, journal_store: J, chart: C) -> Self {
        Self {
            valuation: ValuationEngine::new(ledger.clone()),
            journal: JournalEngine::new(journal_store, chart.clone()),
            ledger,
            chart,
        }
    }
}

impl<L, J, C, K> PostingService<L, J, C, K>
where
    L: LedgerStore + Clone,
    J: JournalStore,
    C: ChartOfAccounts + Clone,
    K: ItemCostSource,
{
    pub fn with_cost_source(ledger: L, journal_store: J, chart: C, costs: K) -> Self {
        Self {
            valuation: ValuationEngine::with_cost_source(ledger.clone(), costs),
            journal: JournalEngine::new(journal_store, chart.clone()),
            ledger,
            chart,
        }
    }

    /// Dr Accounts Receivable / Cr Sales Revenue. No ledger effect: AR is not
    /// inventory, and stock leaves through its own movement posting.
    pub fn post_sales_invoice(
        &self,
        tenant_id: TenantId,
        req: SalesInvoicePosted,
    ) -> PostingResult<PostingOutcome> {
        let ar = require_account(
            &self.chart,
            tenant_id,
            codes::ACCOUNTS_RECEIVABLE,
            "Accounts Receivable",
        )?;
        let revenue =
            require_account(&self.chart, tenant_id, codes::SALES_REVENUE, "Sales Revenue")?;

        if is_zero(req.total_amount) {
            tracing::warn!(invoice = %req.invoice_code, "zero-amount invoice, skipping posting");
            return Ok(PostingOutcome::skipped("invoice total is zero"));
        }

        let description = format!("Sales invoice {}", req.invoice_code);
        let entry = self.journal.post(
            tenant_id,
            JournalDraft {
                posting_date: req.posting_date,
                document: DocumentRef::new(
                    DocumentType::SalesInvoice,
                    req.invoice_id,
                    req.invoice_code.clone(),
                ),
                description: description.clone(),
                source_module: SourceModule::Ar,
                lines: vec![
                    JournalLine::debit(&ar.code, req.total_amount, &description),
                    JournalLine::credit(&revenue.code, req.total_amount, &description),
                ],
                posted_by: None,
            },
        )?;
        Ok(PostingOutcome::Posted {
            journal_entry: entry,
        })
    }

    /// Dr Cash / Cr Accounts Receivable.
    pub fn post_invoice_payment(
        &self,
        tenant_id: TenantId,
        req: InvoicePaymentReceived,
    ) -> PostingResult<PostingOutcome> {
        let cash = require_account(&self.chart, tenant_id, codes::CASH, "Cash")?;
        let ar = require_account(
            &self.chart,
            tenant_id,
            codes::ACCOUNTS_RECEIVABLE,
            "Accounts Receivable",
        )?;

        if is_zero(req.amount) {
            return Ok(PostingOutcome::skipped("payment amount is zero"));
        }

        let description = format!(
            "Payment ({}) for invoice {}",
            req.method, req.invoice_code
        );
        let entry = self.journal.post(
            tenant_id,
            JournalDraft {
                posting_date: req.posting_date,
                document: DocumentRef::new(
                    DocumentType::InvoicePayment,
                    req.payment_id,
                    req.invoice_code.clone(),
                ),
                description: description.clone(),
                source_module: SourceModule::Ar,
                lines: vec![
                    JournalLine::debit(&cash.code, req.amount, &description),
                    JournalLine::credit(&ar.code, req.amount, &description),
                ],
                posted_by: None,
            },
        )?;
        Ok(PostingOutcome::Posted {
            journal_entry: entry,
        })
    }

    /// Dr Cash (total) and Dr Sales Discount (if any) against Cr Sales
    /// Revenue (gross subtotal) and Cr Sales Tax Payable (if any).
    ///
    /// The discount leg is a debit: contra-revenue, so the entry balances
    /// (`total + discount == subtotal + tax`). The orchestrator, not the
    /// caller, owns that equality; inconsistent totals fail validation.
    pub fn post_pos_sale(
        &self,
        tenant_id: TenantId,
        req: PosSaleCompleted,
    ) -> PostingResult<PostingOutcome> {
        let cash = require_account(&self.chart, tenant_id, codes::CASH, "Cash")?;
        let revenue =
            require_account(&self.chart, tenant_id, codes::SALES_REVENUE, "Sales Revenue")?;
        let discount = if req.discount > 0.0 {
            Some(require_account(
                &self.chart,
                tenant_id,
                codes::SALES_DISCOUNT,
                "Sales Discount",
            )?)
        } else {
            None
        };
        let tax = if req.tax > 0.0 {
            Some(require_account(
                &self.chart,
                tenant_id,
                codes::SALES_TAX_PAYABLE,
                "Sales Tax Payable",
            )?)
        } else {
            None
        };

        if is_zero(req.subtotal) && is_zero(req.total_amount) {
            tracing::warn!(txn = %req.txn_code, "zero-amount POS sale, skipping posting");
            return Ok(PostingOutcome::skipped("POS sale total is zero"));
        }

        let description = format!("POS sale {}", req.txn_code);
        let mut lines = Vec::with_capacity(4);
        // A fully-discounted sale collects nothing; no Cash leg then.
        if !is_zero(req.total_amount) {
            lines.push(JournalLine::debit(&cash.code, req.total_amount, &description));
        }
        if let Some(discount) = &discount {
            lines.push(JournalLine::debit(&discount.code, req.discount, &description));
        }
        lines.push(JournalLine::credit(&revenue.code, req.subtotal, &description));
        if let Some(tax) = &tax {
            lines.push(JournalLine::credit(&tax.code, req.tax, &description));
        }

        let entry = self.journal.post(
            tenant_id,
            JournalDraft {
                posting_date: req.posting_date,
                document: DocumentRef::new(
                    DocumentType::PosTransaction,
                    req.txn_id,
                    req.txn_code.clone(),
                ),
                description,
                source_module: SourceModule::Pos,
                lines,
                posted_by: None,
            },
        )?;
        Ok(PostingOutcome::Posted {
            journal_entry: entry,
        })
    }

    /// Cost a list of (item, quantity) pairs at current valuation rates.
    pub fn calculate_cogs(
        &self,
        tenant_id: TenantId,
        items: &[CogsRequestLine],
    ) -> PostingResult<CogsBreakdown> {
        self.valuation.compute_cogs(tenant_id, items)
    }

    /// Dr COGS / Cr Inventory for the valuation of the consumed items, plus
    /// one negative-delta ledger entry per item. Skipped when total COGS is 0.
    pub fn post_pos_cogs(
        &self,
        tenant_id: TenantId,
        req: PosCogsRequested,
    ) -> PostingResult<PostingOutcome> {
        let cogs = require_account(
            &self.chart,
            tenant_id,
            codes::COST_OF_GOODS_SOLD,
            "Cost of Goods Sold",
        )?;
        let inventory =
            require_account(&self.chart, tenant_id, codes::INVENTORY, "Inventory")?;

        // POS rate lookups are warehouse-agnostic by design.
        let request_lines: Vec<CogsRequestLine> = req
            .items
            .iter()
            .map(|i| CogsRequestLine {
                item: i.item,
                quantity: i.quantity,
            })
            .collect();
        let breakdown = self.valuation.compute_cogs(tenant_id, &request_lines)?;

        if is_zero(breakdown.total) {
            tracing::warn!(txn = %req.txn_code, "total COGS is zero, skipping posting");
            return Ok(PostingOutcome::skipped("total COGS is zero"));
        }

        let document =
            DocumentRef::new(DocumentType::PosTransaction, req.txn_id, req.txn_code.clone());
        let description = format!("COGS for POS sale {}", req.txn_code);
        let entry = self.journal.post(
            tenant_id,
            JournalDraft {
                posting_date: req.posting_date,
                document: document.clone(),
                description: description.clone(),
                source_module: SourceModule::Cogs,
                lines: vec![
                    JournalLine::debit(&cogs.code, breakdown.total, &description),
                    JournalLine::credit(&inventory.code, breakdown.total, &description),
                ],
                posted_by: None,
            },
        )?;

        let mut appended: Vec<StockLedgerEntry> = Vec::with_capacity(req.items.len());
        for (consumed, costed) in req.items.iter().zip(&breakdown.lines) {
            let movement = StockMovement {
                item: consumed.item,
                warehouse: consumed.warehouse,
                posted_at: req
                    .posting_date
                    .and_hms_opt(0, 0, 0)
                    .unwrap_or_default()
                    .and_utc(),
                quantity_delta: -consumed.quantity,
                valuation_rate: costed.rate,
                document: document.clone(),
                voucher_type: "POS Transaction".to_string(),
                voucher_no: req.txn_code.clone(),
            };
            match self.ledger.append(tenant_id, movement) {
                Ok(ledger_entry) => appended.push(ledger_entry),
                Err(err) => {
                    return Err(self.compensate(tenant_id, &entry, &appended, err));
                }
            }
        }

        Ok(PostingOutcome::Posted {
            journal_entry: entry,
        })
    }

    /// Void a POS transaction: mirror every posted journal entry for the
    /// document and offset every ledger entry it produced.
    pub fn reverse_pos_transaction(
        &self,
        tenant_id: TenantId,
        txn_id: DocumentId,
    ) -> PostingResult<ReversalOutcome> {
        self.reverse_document(tenant_id, txn_id)
    }

    /// Generic document void. Journal entries are reversed first (sign-flipped
    /// copies; originals untouched), then the document's ledger entries are
    /// offset. A ledger failure after the journals were reversed leaves
    /// financial and inventory records out of step and is unrecoverable.
    pub fn reverse_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<ReversalOutcome> {
        let originals = self.journal.store().find_by_document(tenant_id, doc_id)?;
        if originals.is_empty() {
            return Err(PostingError::validation(format!(
                "no posted journal entries for document {doc_id}"
            )));
        }

        // Snapshot before appending: offsets reference the same document.
        let ledger_entries = self.ledger.entries_for_document(tenant_id, doc_id)?;

        let mut reversed = Vec::with_capacity(originals.len());
        for (entry, lines) in &originals {
            reversed.push(self.journal.reverse(tenant_id, entry, lines)?);
        }

        for original in &ledger_entries {
            let movement = StockMovement {
                item: original.item,
                warehouse: original.warehouse,
                posted_at: original.posted_at,
                quantity_delta: -original.quantity_delta,
                valuation_rate: original.valuation_rate,
                document: original.document.clone(),
                voucher_type: "Reversal".to_string(),
                voucher_no: original.voucher_no.clone(),
            };
            if let Err(err) = self.ledger.append(tenant_id, movement) {
                tracing::error!(
                    document = %doc_id,
                    error = %err,
                    "ledger offset failed after journals were reversed"
                );
                return Err(PostingError::unrecoverable(format!(
                    "journals for document {doc_id} reversed but ledger offset failed: {err}"
                )));
            }
        }

        tracing::info!(
            document = %doc_id,
            journals = reversed.len(),
            ledger_entries = ledger_entries.len(),
            "document reversed"
        );
        Ok(ReversalOutcome {
            reversed_journals: reversed,
            ledger_reversals: ledger_entries.len(),
        })
    }

    /// Post a stock adjustment: one signed ledger entry per counted
    /// difference, and a journal entry for the net value effect (gain:
    /// Dr Inventory / Cr COGS; loss: the opposite). Zero-delta lines are
    /// dropped; an adjustment with no remaining lines is skipped entirely.
    pub fn post_stock_adjustment(
        &self,
        tenant_id: TenantId,
        req: StockAdjustmentApproved,
    ) -> PostingResult<AdjustmentOutcome> {
        let active: Vec<_> = req
            .items
            .iter()
            .copied()
            .filter(|line| !is_zero(line.quantity_delta))
            .collect();
        if active.is_empty() {
            tracing::warn!(adjustment = %req.adjustment_code, "zero net difference, skipping posting");
            return Ok(AdjustmentOutcome::Skipped {
                reason: "adjustment has zero net difference".to_string(),
            });
        }

        let inventory =
            require_account(&self.chart, tenant_id, codes::INVENTORY, "Inventory")?;
        let cogs = require_account(
            &self.chart,
            tenant_id,
            codes::COST_OF_GOODS_SOLD,
            "Cost of Goods Sold",
        )?;

        let mut rated = Vec::with_capacity(active.len());
        let mut net_value = 0.0;
        for line in &active {
            let rate =
                self.valuation
                    .valuation_rate_for(tenant_id, line.item, Some(line.warehouse))?;
            net_value += line.quantity_delta * rate;
            rated.push((*line, rate));
        }

        let voucher_no = self.ledger.next_voucher_no(tenant_id)?;
        let document = DocumentRef::new(
            DocumentType::StockAdjustment,
            req.adjustment_id,
            req.adjustment_code.clone(),
        );
        let description = format!("Stock adjustment {}", req.adjustment_code);

        // Value-neutral adjustments move quantities without a journal entry.
        let journal_entry = if is_zero(net_value) {
            None
        } else {
            let magnitude = net_value.abs();
            let lines = if net_value > 0.0 {
                vec![
                    JournalLine::debit(&inventory.code, magnitude, &description),
                    JournalLine::credit(&cogs.code, magnitude, &description),
                ]
            } else {
                vec![
                    JournalLine::debit(&cogs.code, magnitude, &description),
                    JournalLine::credit(&inventory.code, magnitude, &description),
                ]
            };
            Some(self.journal.post(
                tenant_id,
                JournalDraft {
                    posting_date: req.posting_date,
                    document: document.clone(),
                    description: description.clone(),
                    source_module: SourceModule::Inventory,
                    lines,
                    posted_by: None,
                },
            )?)
        };

        let mut appended: Vec<StockLedgerEntry> = Vec::with_capacity(rated.len());
        for (line, rate) in &rated {
            let movement = StockMovement {
                item: line.item,
                warehouse: line.warehouse,
                posted_at: req
                    .posting_date
                    .and_hms_opt(0, 0, 0)
                    .unwrap_or_default()
                    .and_utc(),
                quantity_delta: line.quantity_delta,
                valuation_rate: *rate,
                document: document.clone(),
                voucher_type: "Stock Adjustment".to_string(),
                voucher_no: voucher_no.clone(),
            };
            match self.ledger.append(tenant_id, movement) {
                Ok(ledger_entry) => appended.push(ledger_entry),
                Err(err) => {
                    let err = match &journal_entry {
                        Some(entry) => self.compensate(tenant_id, entry, &appended, err),
                        None => {
                            self.compensate_ledger_only(tenant_id, &voucher_no, &appended, err)
                        }
                    };
                    return Err(err);
                }
            }
        }

        Ok(AdjustmentOutcome::Posted {
            voucher_no,
            journal_entry,
        })
    }

    /// Pass-through ledger append (external interface).
    pub fn append_ledger_entry(
        &self,
        tenant_id: TenantId,
        movement: StockMovement,
    ) -> PostingResult<StockLedgerEntry> {
        self.ledger.append(tenant_id, movement)
    }

    /// Pass-through latest balance (external interface).
    pub fn latest_stock_balance(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: WarehouseId,
    ) -> PostingResult<StockBalance> {
        self.ledger.latest_balance(tenant_id, item, warehouse)
    }

    /// Undo a partially-applied posting: offset the ledger entries already
    /// appended, then delete the journal. Returns the error to surface; a
    /// failure inside compensation upgrades it to unrecoverable.
    fn compensate(
        &self,
        tenant_id: TenantId,
        journal_entry: &JournalEntry,
        appended: &[StockLedgerEntry],
        cause: PostingError,
    ) -> PostingError {
        tracing::warn!(
            journal = %journal_entry.code,
            appended = appended.len(),
            error = %cause,
            "ledger append failed, rolling back posting"
        );

        if let Err(err) = self.offset_appended(tenant_id, appended) {
            tracing::error!(
                journal = %journal_entry.code,
                error = %err,
                "ledger offset failed during rollback, state inconsistent"
            );
            return PostingError::unrecoverable(format!(
                "rollback of {} failed while offsetting ledger entries: {err}",
                journal_entry.code
            ));
        }

        if let Err(err) = self
            .journal
            .store()
            .delete_entry(tenant_id, journal_entry.id)
        {
            tracing::error!(
                journal = %journal_entry.code,
                error = %err,
                "journal delete failed during rollback, state inconsistent"
            );
            return PostingError::unrecoverable(format!(
                "rollback of {} failed while deleting the journal: {err}",
                journal_entry.code
            ));
        }

        cause
    }

    /// Rollback for postings that wrote no journal entry: offset the ledger
    /// entries already appended and surface the original error.
    fn compensate_ledger_only(
        &self,
        tenant_id: TenantId,
        voucher_no: &str,
        appended: &[StockLedgerEntry],
        cause: PostingError,
    ) -> PostingError {
        tracing::warn!(
            voucher = %voucher_no,
            appended = appended.len(),
            error = %cause,
            "ledger append failed, offsetting earlier entries"
        );

        if let Err(err) = self.offset_appended(tenant_id, appended) {
            tracing::error!(
                voucher = %voucher_no,
                error = %err,
                "ledger offset failed during rollback, state inconsistent"
            );
            return PostingError::unrecoverable(format!(
                "rollback of voucher {voucher_no} failed while offsetting ledger entries: {err}"
            ));
        }

        cause
    }

    fn offset_appended(
        &self,
        tenant_id: TenantId,
        appended: &[StockLedgerEntry],
    ) -> PostingResult<()> {
        for entry in appended {
            let offset = StockMovement {
                item: entry.item,
                warehouse: entry.warehouse,
                posted_at: entry.posted_at,
                quantity_delta: -entry.quantity_delta,
                valuation_rate: entry.valuation_rate,
                document: entry.document.clone(),
                voucher_type: "Reversal".to_string(),
                voucher_no: entry.voucher_no.clone(),
            };
            self.ledger.append(tenant_id, offset)?;
        }
        Ok(())
    }
}
