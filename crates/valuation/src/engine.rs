use serde::{Deserialize, Serialize};

use ledgerpost_core::{ItemId, PostingResult, TenantId, WarehouseId};
use ledgerpost_ledger::LedgerStore;

/// Fallback cost lookup for items with no ledger history yet.
///
/// Owned by item/catalog setup; read-only here. Implementations return the
/// configured purchase or standard cost, if any.
pub trait ItemCostSource: Send + Sync {
    fn purchase_cost(&self, tenant_id: TenantId, item: ItemId) -> Option<f64>;
}

/// A cost source that never resolves (items are costed from the ledger only).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCostSource;

impl ItemCostSource for NoCostSource {
    fn purchase_cost(&self, _tenant_id: TenantId, _item: ItemId) -> Option<f64> {
        None
    }
}

/// One (item, quantity) pair to be costed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CogsRequestLine {
    pub item: ItemId,
    pub quantity: f64,
}

/// Costed line: quantity × most recent valuation rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CogsLine {
    pub item: ItemId,
    pub quantity: f64,
    pub rate: f64,
    pub cost: f64,
}

/// Per-line costs and their total for one sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CogsBreakdown {
    pub lines: Vec<CogsLine>,
    pub total: f64,
}

/// Derives cost basis from the stock ledger.
///
/// Valuation is a read-mostly view over the ledger; there is deliberately no
/// separate mutable "current cost" table that could drift from it. The latest
/// non-cancelled entry's rate is authoritative.
pub struct ValuationEngine<L, C = NoCostSource> {
    ledger: L,
    costs: C,
}

impl<L> ValuationEngine<L>
where
    L: LedgerStore,
{
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            costs: NoCostSource,
        }
    }
}

impl<L, C> ValuationEngine<L, C>
where
    L: LedgerStore,
    C: ItemCostSource,
{
    pub fn with_cost_source(ledger: L, costs: C) -> Self {
        Self { ledger, costs }
    }

    /// Rate of the most recent ledger entry for the item.
    ///
    /// POS lookups pass `warehouse = None` (most recent rate across all
    /// warehouses). Falls back to the item's configured purchase cost when no
    /// entry exists, and to 0 when neither is known.
    pub fn valuation_rate_for(
        &self,
        tenant_id: TenantId,
        item: ItemId,
        warehouse: Option<WarehouseId>,
    ) -> PostingResult<f64> {
        if let Some(rate) = self.ledger.latest_rate(tenant_id, item, warehouse)? {
            return Ok(rate);
        }
        Ok(self.costs.purchase_cost(tenant_id, item).unwrap_or(0.0))
    }

    /// Cost each line at its current valuation rate.
    ///
    /// Lines with no rate available are included at cost 0 rather than failing
    /// the whole computation: a sale is never blocked by missing valuation.
    pub fn compute_cogs(
        &self,
        tenant_id: TenantId,
        items: &[CogsRequestLine],
    ) -> PostingResult<CogsBreakdown> {
        let mut lines = Vec::with_capacity(items.len());
        let mut total = 0.0;

        for line in items {
            let rate = self.valuation_rate_for(tenant_id, line.item, None)?;
            let cost = line.quantity * rate;
            if rate == 0.0 {
                tracing::debug!(item = %line.item, "no valuation rate available, costing line at 0");
            }
            total += cost;
            lines.push(CogsLine {
                item: line.item,
                quantity: line.quantity,
                rate,
                cost,
            });
        }

        Ok(CogsBreakdown { lines, total })
    }
}
