use serde::{Deserialize, Serialize};

use ledgerpost_core::JournalEntryId;
use ledgerpost_journal::JournalEntry;

/// Result of one orchestrated posting.
///
/// A legitimate zero-effect event (zero net adjustment, zero COGS) is
/// `Skipped`, never an empty posted entry and never an error: callers must be
/// able to tell "nothing to post" from failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostingOutcome {
    Posted { journal_entry: JournalEntry },
    Skipped { reason: String },
}

impl PostingOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn journal_entry(&self) -> Option<&JournalEntry> {
        match self {
            Self::Posted { journal_entry } => Some(journal_entry),
            Self::Skipped { .. } => None,
        }
    }

    pub fn journal_entry_id(&self) -> Option<JournalEntryId> {
        self.journal_entry().map(|e| e.id)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Result of posting a stock adjustment.
///
/// The voucher code is allocated even when the net value effect cancels out
/// and no journal entry is warranted (ledger entries still carry it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdjustmentOutcome {
    Posted {
        voucher_no: String,
        journal_entry: Option<JournalEntry>,
    },
    Skipped {
        reason: String,
    },
}

impl AdjustmentOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Result of voiding a posted document: one reversing journal entry per
/// original entry, plus offsetting ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversalOutcome {
    pub reversed_journals: Vec<JournalEntry>,
    pub ledger_reversals: usize,
}
