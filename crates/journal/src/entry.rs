use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ledgerpost_core::{DocumentRef, JournalEntryId, TenantId};

/// Journal entry lifecycle.
///
/// Automated postings are created directly as `Posted`; `Draft` exists only
/// for manual entries outside this core. A posted entry is never mutated:
/// cancellation is expressed by posting a reversing entry, and the historical
/// entry keeps its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    Draft,
    Posted,
    Cancelled,
}

/// Module that originated a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceModule {
    Ar,
    Ap,
    Inventory,
    Cogs,
    Manual,
    Pos,
}

/// One debit-or-credit leg of a journal entry.
///
/// Exactly one of `debit`/`credit` is strictly positive and the other is
/// exactly zero. Created in bulk alongside the header; immutable afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub account_code: String,
    pub debit: f64,
    pub credit: f64,
    pub description: String,
    /// Ordering within the entry, 1-based.
    pub line_no: u32,
}

impl JournalLine {
    pub fn debit(account_code: impl Into<String>, amount: f64, description: impl Into<String>) -> Self {
        Self {
            account_code: account_code.into(),
            debit: amount,
            credit: 0.0,
            description: description.into(),
            line_no: 0,
        }
    }

    pub fn credit(account_code: impl Into<String>, amount: f64, description: impl Into<String>) -> Self {
        Self {
            account_code: account_code.into(),
            debit: 0.0,
            credit: amount,
            description: description.into(),
            line_no: 0,
        }
    }

    /// Mirror leg: debits become credits and vice versa, magnitudes kept.
    pub fn mirrored(&self) -> Self {
        Self {
            account_code: self.account_code.clone(),
            debit: self.credit,
            credit: self.debit,
            description: self.description.clone(),
            line_no: self.line_no,
        }
    }
}

/// One balanced accounting event (header).
///
/// `total_debit == total_credit` holds for every posted entry, within the
/// shared amount tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub tenant_id: TenantId,
    /// Serial per-tenant code, e.g. "JE-000042".
    pub code: String,
    pub posting_date: NaiveDate,
    pub document: DocumentRef,
    pub description: String,
    pub status: JournalStatus,
    pub source_module: SourceModule,
    pub total_debit: f64,
    pub total_credit: f64,
    pub posted_by: Option<String>,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input to the journal engine: an entry not yet coded or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalDraft {
    pub posting_date: NaiveDate,
    pub document: DocumentRef,
    pub description: String,
    pub source_module: SourceModule,
    pub lines: Vec<JournalLine>,
    pub posted_by: Option<String>,
}
