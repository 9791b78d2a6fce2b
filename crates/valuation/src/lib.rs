//! Inventory valuation module.
//!
//! Derives cost of goods sold and current valuation rates from the stock
//! ledger. Read-mostly; never a second source of truth.

pub mod engine;

pub use engine::{
    CogsBreakdown, CogsLine, CogsRequestLine, ItemCostSource, NoCostSource, ValuationEngine,
};
