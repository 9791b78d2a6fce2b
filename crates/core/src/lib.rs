//! `ledgerpost-core` — shared foundation for the posting core.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the posting error taxonomy, and amount helpers.

pub mod amount;
pub mod document;
pub mod error;
pub mod id;

pub use amount::{AMOUNT_EPSILON, amounts_equal, is_zero};
pub use document::{DocumentRef, DocumentType};
pub use error::{PostingError, PostingResult};
pub use id::{DocumentId, ItemId, JournalEntryId, TenantId, WarehouseId};
