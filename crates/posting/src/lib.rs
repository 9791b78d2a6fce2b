//! Posting orchestrators: one per business event, all over one shared
//! balanced-journal primitive.
//!
//! Each orchestrator receives a fully-resolved domain event, resolves the
//! accounts it needs, derives valuation effects from the stock ledger, and
//! persists the paired journal + ledger records with rollback on partial
//! failure. Zero-effect events are skipped, never posted empty.

pub mod outcome;
pub mod requests;
pub mod service;

pub use outcome::{AdjustmentOutcome, PostingOutcome, ReversalOutcome};
pub use requests::{
    AdjustmentLine, ConsumedItem, InvoicePaymentReceived, PaymentMethod, PosCogsRequested,
    PosSaleCompleted, SalesInvoicePosted, StockAdjustmentApproved,
};
pub use service::PostingService;
