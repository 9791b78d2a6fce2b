use chrono::Utc;

use ledgerpost_core::{JournalEntryId, PostingError, PostingResult, TenantId};

use crate::account::ChartOfAccounts;
use crate::entry::{JournalDraft, JournalEntry, JournalLine, JournalStatus};
use crate::store::JournalStore;
use crate::validate::{posting_date_bounds_error, validate_lines};

/// Validates and persists balanced double-entry postings.
pub struct JournalEngine<S, C> {
    store: S,
    chart: C,
}

impl<S, C> JournalEngine<S, C>
where
    S: JournalStore,
    C: ChartOfAccounts,
{
    pub fn new(store: S, chart: C) -> Self {
        Self { store, chart }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate, code, and persist a draft as a posted entry.
    ///
    /// Sequence: validate lines (all violations collected) and the posting
    /// date, allocate the next serial code, write the header with status
    /// `posted`, write all lines. If line insertion fails the header is
    /// deleted so no orphan header can persist; a failed compensation is
    /// escalated as unrecoverable.
    pub fn post(&self, tenant_id: TenantId, draft: JournalDraft) -> PostingResult<JournalEntry> {
        let now = Utc::now();

        let mut errors = validate_lines(&self.chart, tenant_id, &draft.lines).errors;
        if let Some(date_err) = posting_date_bounds_error(draft.posting_date, now.date_naive()) {
            errors.push(date_err);
        }
        if !errors.is_empty() {
            return Err(PostingError::Validation(errors));
        }

        let code = self.store.next_journal_code(tenant_id)?;

        let mut lines = draft.lines;
        for (idx, line) in lines.iter_mut().enumerate() {
            line.line_no = (idx + 1) as u32;
        }
        let total_debit: f64 = lines.iter().map(|l| l.debit).sum();
        let total_credit: f64 = lines.iter().map(|l| l.credit).sum();

        let entry = JournalEntry {
            id: JournalEntryId::new(),
            tenant_id,
            code,
            posting_date: draft.posting_date,
            document: draft.document,
            description: draft.description,
            status: JournalStatus::Posted,
            source_module: draft.source_module,
            total_debit,
            total_credit,
            posted_by: draft.posted_by,
            posted_at: now,
            created_at: now,
        };

        self.store.insert_header(&entry)?;

        if let Err(err) = self.store.insert_lines(tenant_id, entry.id, &lines) {
            tracing::warn!(
                journal = %entry.code,
                error = %err,
                "line insertion failed, deleting orphan header"
            );
            if let Err(delete_err) = self.store.delete_entry(tenant_id, entry.id) {
                tracing::error!(
                    journal = %entry.code,
                    error = %delete_err,
                    "compensating header delete failed, journal state inconsistent"
                );
                return Err(PostingError::unrecoverable(format!(
                    "journal {} left without lines and header delete failed: {delete_err}",
                    entry.code
                )));
            }
            return Err(err);
        }

        tracing::info!(
            journal = %entry.code,
            document = %entry.document.code,
            total = entry.total_debit,
            "journal entry posted"
        );
        Ok(entry)
    }

    /// Post a new entry that cancels a prior one: every leg sign-flipped,
    /// same document reference. The original is never mutated, preserving the
    /// full audit trail.
    pub fn reverse(
        &self,
        tenant_id: TenantId,
        original: &JournalEntry,
        original_lines: &[JournalLine],
    ) -> PostingResult<JournalEntry> {
        let lines: Vec<JournalLine> = original_lines.iter().map(JournalLine::mirrored).collect();
        self.post(
            tenant_id,
            JournalDraft {
                posting_date: original.posting_date,
                document: original.document.clone(),
                description: format!("Reversal of {}", original.code),
                source_module: original.source_module,
                lines,
                posted_by: None,
            },
        )
    }
}
