//! Reconciliation helpers over stored ledger entries.

use ledgerpost_core::amounts_equal;
use ledgerpost_ledger::StockLedgerEntry;

/// Check that consecutive entries form a strictly running balance:
/// `quantity_after[i] == quantity_after[i-1] + delta[i]`, starting from zero.
///
/// Returns the first violation found, described for an operator.
pub fn verify_running_balance(entries: &[StockLedgerEntry]) -> Result<(), String> {
    let mut previous = 0.0;
    for (idx, entry) in entries.iter().enumerate() {
        let expected = previous + entry.quantity_delta;
        if !amounts_equal(entry.quantity_after, expected) {
            return Err(format!(
                "entry {idx} ({voucher}): quantity_after {actual} != {prev} + {delta}",
                voucher = entry.voucher_no,
                actual = entry.quantity_after,
                prev = previous,
                delta = entry.quantity_delta,
            ));
        }
        previous = entry.quantity_after;
    }
    Ok(())
}
