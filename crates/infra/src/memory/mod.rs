//! In-memory store implementations (tests/dev).

pub mod accounts;
pub mod journal;
pub mod ledger;

pub use accounts::InMemoryChartOfAccounts;
pub use journal::InMemoryJournalStore;
pub use ledger::InMemoryLedgerStore;
