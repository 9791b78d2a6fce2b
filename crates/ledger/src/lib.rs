//! Stock ledger module (append-only inventory movements).
//!
//! Pure domain logic plus the store contract: no IO, no HTTP, no persistence
//! concerns. Store implementations live in `ledgerpost-infra`.

pub mod entry;
pub mod store;

pub use entry::{StockBalance, StockLedgerEntry, StockMovement};
pub use ledgerpost_core::{DocumentRef, DocumentType};
pub use store::LedgerStore;
