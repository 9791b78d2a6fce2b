use std::collections::HashMap;
use std::sync::RwLock;

use ledgerpost_core::{DocumentId, JournalEntryId, PostingError, PostingResult, TenantId};
use ledgerpost_journal::{JournalEntry, JournalLine, JournalStore};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    tenant_id: TenantId,
    entry_id: JournalEntryId,
}

/// In-memory journal store.
///
/// Intended for tests/dev. Journal-code allocation is an atomic
/// get-and-increment under the write lock; codes are monotonic per tenant
/// and never duplicated (gaps are fine after a compensated failure).
#[derive(Debug, Default)]
pub struct InMemoryJournalStore {
    entries: RwLock<HashMap<EntryKey, (JournalEntry, Vec<JournalLine>)>>,
    code_seq: RwLock<HashMap<TenantId, u64>>,
}

impl InMemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> PostingError {
        PostingError::persistence("journal store lock poisoned")
    }
}

impl JournalStore for InMemoryJournalStore {
    fn insert_header(&self, entry: &JournalEntry) -> PostingResult<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        let key = EntryKey {
            tenant_id: entry.tenant_id,
            entry_id: entry.id,
        };
        if entries.contains_key(&key) {
            return Err(PostingError::persistence(format!(
                "journal entry {} already exists",
                entry.code
            )));
        }
        entries.insert(key, (entry.clone(), Vec::new()));
        Ok(())
    }

    fn insert_lines(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
        lines: &[JournalLine],
    ) -> PostingResult<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        let key = EntryKey {
            tenant_id,
            entry_id,
        };
        match entries.get_mut(&key) {
            Some((_, stored)) => {
                stored.extend_from_slice(lines);
                Ok(())
            }
            None => Err(PostingError::persistence(format!(
                "journal entry {entry_id} has no header"
            ))),
        }
    }

    fn delete_entry(&self, tenant_id: TenantId, entry_id: JournalEntryId) -> PostingResult<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.remove(&EntryKey {
            tenant_id,
            entry_id,
        });
        Ok(())
    }

    fn get(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> PostingResult<Option<(JournalEntry, Vec<JournalLine>)>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries
            .get(&EntryKey {
                tenant_id,
                entry_id,
            })
            .cloned())
    }

    fn find_by_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<Vec<(JournalEntry, Vec<JournalLine>)>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        let mut found: Vec<(JournalEntry, Vec<JournalLine>)> = entries
            .iter()
            .filter(|(key, (entry, _))| {
                key.tenant_id == tenant_id && entry.document.doc_id == doc_id
            })
            .map(|(_, stored)| stored.clone())
            .collect();
        found.sort_by(|(a, _), (b, _)| a.code.cmp(&b.code));
        Ok(found)
    }

    fn next_journal_code(&self, tenant_id: TenantId) -> PostingResult<String> {
        let mut seq = self.code_seq.write().map_err(|_| Self::poisoned())?;
        let counter = seq.entry(tenant_id).or_insert(0);
        *counter += 1;
        Ok(format!("JE-{:06}", *counter))
    }
}
