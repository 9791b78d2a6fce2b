//! `ledgerpost-infra` — store implementations and cross-crate tests.
//!
//! The domain crates own the store contracts; this crate provides the
//! in-memory implementations used by tests and dev hosts, plus
//! reconciliation helpers.

pub mod audit;
pub mod memory;


pub use audit::verify_running_balance;
pub use memory::{InMemoryChartOfAccounts, InMemoryJournalStore, InMemoryLedgerStore};
