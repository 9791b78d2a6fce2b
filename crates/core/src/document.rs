//! Business-document references shared by the ledger and journal sides.

use serde::{Deserialize, Serialize};

use crate::id::DocumentId;

/// Kind of business document that originated a movement or journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    SalesInvoice,
    InvoicePayment,
    PosTransaction,
    StockAdjustment,
    Manual,
}

impl core::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            DocumentType::SalesInvoice => "sales_invoice",
            DocumentType::InvoicePayment => "invoice_payment",
            DocumentType::PosTransaction => "pos_transaction",
            DocumentType::StockAdjustment => "stock_adjustment",
            DocumentType::Manual => "manual",
        };
        f.write_str(s)
    }
}

/// Reference back to the originating business document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub doc_type: DocumentType,
    pub doc_id: DocumentId,
    /// Human-readable code of the document (e.g. "INV-0042", "POS-0117").
    pub code: String,
}

impl DocumentRef {
    pub fn new(doc_type: DocumentType, doc_id: DocumentId, code: impl Into<String>) -> Self {
        Self {
            doc_type,
            doc_id,
            code: code.into(),
        }
    }
}
