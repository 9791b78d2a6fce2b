//! Posting requests: transient input contracts, one per business event.
//!
//! Each carries a fully-resolved domain event with its computed monetary
//! totals. Orchestrators never recompute business totals; they derive only
//! the accounting and ledger effects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ledgerpost_core::{DocumentId, ItemId, WarehouseId};

/// How an invoice payment was made. Recorded in the journal description only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    MobileWallet,
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::MobileWallet => "mobile_wallet",
        };
        f.write_str(s)
    }
}

/// A sales invoice was posted (AR side only; stock moves separately).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesInvoicePosted {
    pub invoice_id: DocumentId,
    pub invoice_code: String,
    pub customer_id: DocumentId,
    pub posting_date: NaiveDate,
    pub total_amount: f64,
}

/// A payment was received against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoicePaymentReceived {
    pub payment_id: DocumentId,
    pub invoice_id: DocumentId,
    pub invoice_code: String,
    pub posting_date: NaiveDate,
    pub amount: f64,
    pub method: PaymentMethod,
}

/// A POS sale was completed at the till.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosSaleCompleted {
    pub txn_id: DocumentId,
    pub txn_code: String,
    pub posting_date: NaiveDate,
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total_amount: f64,
}

/// One item line consumed by a POS sale (for COGS posting).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumedItem {
    pub item: ItemId,
    /// Warehouse the stock leaves from (resolved by the caller).
    pub warehouse: WarehouseId,
    pub quantity: f64,
}

/// COGS posting for a completed POS sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosCogsRequested {
    pub txn_id: DocumentId,
    pub txn_code: String,
    pub posting_date: NaiveDate,
    pub items: Vec<ConsumedItem>,
}

/// One counted difference in a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLine {
    pub item: ItemId,
    pub warehouse: WarehouseId,
    /// Signed counted difference (positive = found stock, negative = shrinkage).
    pub quantity_delta: f64,
}

/// A stock adjustment was approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAdjustmentApproved {
    pub adjustment_id: DocumentId,
    pub adjustment_code: String,
    pub posting_date: NaiveDate,
    pub items: Vec<AdjustmentLine>,
}
