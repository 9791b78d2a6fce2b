//! Double-entry journal module.
//!
//! Account model, journal header/line model, balance validation, and the
//! posting engine with its compensating-delete policy. Store implementations
//! live in `ledgerpost-infra`.

pub mod account;
pub mod engine;
pub mod entry;
pub mod store;
pub mod validate;

pub use account::{Account, AccountKind, ChartOfAccounts, codes, require_account};
pub use engine::JournalEngine;
pub use entry::{JournalDraft, JournalEntry, JournalLine, JournalStatus, SourceModule};
pub use store::JournalStore;
pub use validate::{
    ValidationReport, posting_date_bounds_error, validate_lines, validate_posting_date,
};
