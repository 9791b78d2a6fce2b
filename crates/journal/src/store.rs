use ledgerpost_core::{DocumentId, JournalEntryId, PostingResult, TenantId};

use crate::entry::{JournalEntry, JournalLine};

/// Persistence contract for journal headers and lines.
///
/// Header and lines are written separately so the engine can apply the
/// compensating-delete policy when line persistence fails. `delete_entry`
/// exists ONLY for that compensation path; posted entries are otherwise
/// immutable and corrections go through reversing entries.
pub trait JournalStore: Send + Sync {
    fn insert_header(&self, entry: &JournalEntry) -> PostingResult<()>;

    /// Bulk-insert the lines of one entry.
    fn insert_lines(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
        lines: &[JournalLine],
    ) -> PostingResult<()>;

    /// Compensating delete of a header (and any lines) after a partial write.
    fn delete_entry(&self, tenant_id: TenantId, entry_id: JournalEntryId) -> PostingResult<()>;

    fn get(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> PostingResult<Option<(JournalEntry, Vec<JournalLine>)>>;

    /// All entries referencing a business document, oldest first.
    fn find_by_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<Vec<(JournalEntry, Vec<JournalLine>)>>;

    /// Next serial journal code for the tenant, e.g. "JE-000042".
    ///
    /// Must be an atomic get-and-increment: monotonic and never duplicated
    /// under concurrent postings (gaps are tolerated).
    fn next_journal_code(&self, tenant_id: TenantId) -> PostingResult<String>;
}

impl<S> JournalStore for std::sync::Arc<S>
where
    S: JournalStore + ?Sized,
{
    fn insert_header(&self, entry: &JournalEntry) -> PostingResult<()> {
        (**self).insert_header(entry)
    }

    fn insert_lines(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
        lines: &[JournalLine],
    ) -> PostingResult<()> {
        (**self).insert_lines(tenant_id, entry_id, lines)
    }

    fn delete_entry(&self, tenant_id: TenantId, entry_id: JournalEntryId) -> PostingResult<()> {
        (**self).delete_entry(tenant_id, entry_id)
    }

    fn get(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> PostingResult<Option<(JournalEntry, Vec<JournalLine>)>> {
        (**self).get(tenant_id, entry_id)
    }

    fn find_by_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<Vec<(JournalEntry, Vec<JournalLine>)>> {
        (**self).find_by_document(tenant_id, doc_id)
    }

    fn next_journal_code(&self, tenant_id: TenantId) -> PostingResult<String> {
        (**self).next_journal_code(tenant_id)
    }
}
