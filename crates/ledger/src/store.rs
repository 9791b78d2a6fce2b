use ledgerpost_core::{DocumentId, ItemId, PostingResult, TenantId, WarehouseId};

use crate::entry::{StockBalance, StockLedgerEntry, StockMovement};

/// Append-only repository of stock movements.
///
/// No update or delete operations are exposed; corrections are made via new
/// offsetting entries. Implementations must serialize `append` per
/// (tenant, item, warehouse) key: the running balance is computed from the
/// latest entry inside the same exclusive section, never from a stale read.
/// Per-tenant voucher numbering must likewise be an atomic get-and-increment.
pub trait LedgerStore: Send + Sync {
    /// Latest balance for a pair; zero if no entry exists yet.
    ///
    /// "Latest" is the last-appended entry, not the highest posting date: the
    /// running balance chains in append order, so a backdated correction
    /// still moves the current balance.
    fn latest_balance(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: WarehouseId,
    ) -> PostingResult<StockBalance>;

    /// Valuation rate of the most recent entry for an item, optionally scoped
    /// to one warehouse. `None` when the item has no ledger history.
    ///
    /// Each pair's stream contributes its last-appended entry; posting time
    /// only arbitrates between streams when the lookup spans warehouses.
    fn latest_rate(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: Option<WarehouseId>,
    ) -> PostingResult<Option<f64>>;

    /// Atomically compute the running balance and append one entry.
    fn append(
        &self,
        tenant_id: TenantId,
        movement: StockMovement,
    ) -> PostingResult<StockLedgerEntry>;

    /// All entries that reference a business document (reversal support).
    fn entries_for_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<Vec<StockLedgerEntry>>;

    /// Next serial voucher code for the tenant, e.g. "STK-000007".
    fn next_voucher_no(&self, tenant_id: TenantId) -> PostingResult<String>;
}

impl<S> LedgerStore for &S
where
    S: LedgerStore + ?Sized,
{
    fn latest_balance(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: WarehouseId,
    ) -> PostingResult<StockBalance> {
        (**self).latest_balance(tenant_id, item, warehouse)
    }

    fn latest_rate(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: Option<WarehouseId>,
    ) -> PostingResult<Option<f64>> {
        (**self).latest_rate(tenant_id, item, warehouse)
    }

    fn append(
        &self,
        tenant_id: TenantId,
        movement: StockMovement,
    ) -> PostingResult<StockLedgerEntry> {
        (**self).append(tenant_id, movement)
    }

    fn entries_for_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<Vec<StockLedgerEntry>> {
        (**self).entries_for_document(tenant_id, doc_id)
    }

    fn next_voucher_no(&self, tenant_id: TenantId) -> PostingResult<String> {
        (**self).next_voucher_no(tenant_id)
    }
}

impl<S> LedgerStore for std::sync::Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn latest_balance(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: WarehouseId,
    ) -> PostingResult<StockBalance> {
        (**self).latest_balance(tenant_id, item, warehouse)
    }

    fn latest_rate(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: Option<WarehouseId>,
    ) -> PostingResult<Option<f64>> {
        (**self).latest_rate(tenant_id, item, warehouse)
    }

    fn append(
        &self,
        tenant_id: TenantId,
        movement: StockMovement,
    ) -> PostingResult<StockLedgerEntry> {
        (**self).append(tenant_id, movement)
    }

    fn entries_for_document(
        &self,
        tenant_id: TenantId,
        doc_id: DocumentId,
    ) -> PostingResult<Vec<StockLedgerEntry>> {
        (**self).entries_for_document(tenant_id, doc_id)
    }

    fn next_voucher_no(&self, tenant_id: TenantId) -> PostingResult<String> {
        (**self).next_voucher_no(tenant_id)
    }
}
