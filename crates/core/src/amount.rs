//! Monetary amount helpers.
//!
//! Amounts are `f64` currency units with a fixed comparison tolerance.
//! Valuation rates are fractional by nature (weighted-average costing), so
//! integer minor units are not used here; every equality check in the core
//! goes through [`amounts_equal`].

/// Tolerance for debit/credit equality checks.
pub const AMOUNT_EPSILON: f64 = 1e-4;

/// True when two amounts are equal within [`AMOUNT_EPSILON`].
pub fn amounts_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < AMOUNT_EPSILON
}

/// True when an amount is zero within [`AMOUNT_EPSILON`].
pub fn is_zero(amount: f64) -> bool {
    amount.abs() < AMOUNT_EPSILON
}
