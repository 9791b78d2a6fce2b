use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use ledgerpost_core::{DocumentId, ItemId, PostingError, PostingResult, TenantId, WarehouseId};
use ledgerpost_ledger::{LedgerStore, StockBalance, StockLedgerEntry, StockMovement};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct PairKey {
    tenant_id: TenantId,
    item: ItemId,
    warehouse: WarehouseId,
}

/// In-memory append-only stock ledger.
///
/// Intended for tests/dev. Appends take the single write lock, so the
/// read-latest-then-append pair is atomic for every key; a database-backed
/// implementation would narrow this to a per-(tenant, item, warehouse) row
/// lock or a conditional insert.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    streams: RwLock<HashMap<PairKey, Vec<StockLedgerEntry>>>,
    voucher_seq: RwLock<HashMap<TenantId, u64>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries for one pair, in append order (audit/reconciliation reads).
    pub fn entries_for_pair(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: WarehouseId,
    ) -> Vec<StockLedgerEntry> {
        let streams = match self.streams.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        streams
            .get(&PairKey {
                tenant_id,
                item,
                warehouse,
            })
            .cloned()
            .unwrap_or_default()
    }

    fn poisoned() -> PostingError {
        PostingError::persistence("ledger store lock poisoned")
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn latest_balance(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: WarehouseId,
    ) -> PostingResult<StockBalance> {
        let streams = self.streams.read().map_err(|_| Self::poisoned())?;
        let balance = streams
            .get(&PairKey {
                tenant_id,
                item,
                warehouse,
            })
            .and_then(|entries| entries.last())
            .map(StockLedgerEntry::balance)
            .unwrap_or_else(StockBalance::zero);
        Ok(balance)
    }

    fn latest_rate(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: Option<WarehouseId>,
    ) -> PostingResult<Option<f64>> {
        let streams = self.streams.read().map_err(|_| Self::poisoned())?;

        let latest = streams
            .iter()
            .filter(|(key, _)| {
                key.tenant_id == tenant_id
                    && key.item == item
                    && warehouse.is_none_or(|w| key.warehouse == w)
            })
            .filter_map(|(_, entries)| entries.last())
            .max_by_key(|e| (e.posted_at, e.created_at));

        Ok(latest.map(|e| e.valuation_rate))
    }

    fn append(
        &self,
        tenant_id: TenantId,
        movement: StockMovement,
    ) -> PostingResult<StockLedgerEntry> {
        let mut streams = self.streams.write().map_err(|_| Self::poisoned())?;

        let key = PairKey {
            tenant_id,
            item: movement.item,
            warehouse: movement.warehouse,
        };
        let stream = streams.entry(key).or_default();

        // Balance read and entry append happen under the same write guard.
        let previous = stream
            .last()
            .map(StockLedgerEntry::balance)
            .unwrap_or_else(StockBalance::zero);

        let entry = StockLedgerEntry::from_movement(tenant_id, previous, movement, Utc::now());
        stream.push(entry.clone());
        Ok(entry)
    }

    fn entries_for_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<Vec<StockLedgerEntry>> {
        let streams = self.streams.read().map_err(|_| Self::poisoned())?;
        let mut entries: Vec<StockLedgerEntry> = streams
            .iter()
            .filter(|(key, _)| key.tenant_id == tenant_id)
            .flat_map(|(_, stream)| stream.iter())
            .filter(|e| e.document.doc_id == doc_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.posted_at, e.created_at, e.entry_id));
        Ok(entries)
    }

    fn next_voucher_no(&self, tenant_id: TenantId) -> PostingResult<String> {
        let mut seq = self.voucher_seq.write().map_err(|_| Self::poisoned())?;
        let counter = seq.entry(tenant_id).or_insert(0);
        *counter += 1;
        Ok(format!("STK-{:06}", *counter))
    }
}
