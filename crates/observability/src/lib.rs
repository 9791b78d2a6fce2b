//! `ledgerpost-observability` — process-level logging setup.
//!
//! The posting crates emit `tracing` events; this crate wires up the
//! subscriber for binaries and test harnesses that want structured output.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
