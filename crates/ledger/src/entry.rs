use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledgerpost_core::{DocumentRef, ItemId, TenantId, WarehouseId};

/// Latest quantity + rate for one (item, warehouse) pair.
///
/// The latest ledger entry is authoritative; this is a projection of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockBalance {
    pub quantity: f64,
    pub valuation_rate: f64,
}

impl StockBalance {
    /// Balance before the first movement for a pair.
    pub fn zero() -> Self {
        Self {
            quantity: 0.0,
            valuation_rate: 0.0,
        }
    }
}

/// One movement to be appended to the stock ledger.
///
/// Callers provide the delta and the rate; the running balance is computed by
/// the store at append time, under its per-key exclusive section, from the
/// balance current at that instant. Callers never compute `quantity_after`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub item: ItemId,
    pub warehouse: WarehouseId,
    pub posted_at: DateTime<Utc>,
    /// Signed quantity change (negative for stock-out).
    pub quantity_delta: f64,
    /// Cost per unit assigned to this movement.
    pub valuation_rate: f64,
    pub document: DocumentRef,
    pub voucher_type: String,
    pub voucher_no: String,
}

/// Immutable fact of one inventory movement.
///
/// Entries for a (tenant, item, warehouse) key, ordered by `posted_at`, form a
/// strictly running balance: `quantity_after[i] = quantity_after[i-1] + delta[i]`.
/// Entries are never updated or deleted; corrections are offsetting entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLedgerEntry {
    pub entry_id: Uuid,
    pub tenant_id: TenantId,
    pub item: ItemId,
    pub warehouse: WarehouseId,
    pub posted_at: DateTime<Utc>,
    pub quantity_delta: f64,
    /// Running balance after this movement.
    pub quantity_after: f64,
    pub valuation_rate: f64,
    /// quantity_after × valuation_rate.
    pub stock_value: f64,
    /// Change in stock value caused by this movement.
    pub stock_value_delta: f64,
    pub document: DocumentRef,
    pub voucher_type: String,
    pub voucher_no: String,
    pub created_at: DateTime<Utc>,
}

impl StockLedgerEntry {
    /// Materialize a movement against the balance current at append time.
    ///
    /// Store implementations call this while holding the per-key write guard,
    /// so the `previous` balance cannot go stale between read and append.
    pub fn from_movement(
        tenant_id: TenantId,
        previous: StockBalance,
        movement: StockMovement,
        now: DateTime<Utc>,
    ) -> Self {
        let quantity_after = previous.quantity + movement.quantity_delta;
        let stock_value = quantity_after * movement.valuation_rate;
        let previous_value = previous.quantity * previous.valuation_rate;

        Self {
            entry_id: Uuid::now_v7(),
            tenant_id,
            item: movement.item,
            warehouse: movement.warehouse,
            posted_at: movement.posted_at,
            quantity_delta: movement.quantity_delta,
            quantity_after,
            valuation_rate: movement.valuation_rate,
            stock_value,
            stock_value_delta: stock_value - previous_value,
            document: movement.document,
            voucher_type: movement.voucher_type,
            voucher_no: movement.voucher_no,
            created_at: now,
        }
    }

    pub fn balance(&self) -> StockBalance {
        StockBalance {
            quantity: self.quantity_after,
            valuation_rate: self.valuation_rate,
        }
    }
}
