use serde::{Deserialize, Serialize};

use ledgerpost_core::{PostingError, PostingResult, TenantId};

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

/// Chart-of-accounts entry, looked up by stable account-number code.
///
/// Owned by tenant setup; read-only from the posting core's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub code: String, // e.g. "A-1100"
    pub name: String, // e.g. "Accounts Receivable"
    pub kind: AccountKind,
    pub active: bool,
}

impl Account {
    pub fn new(code: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind,
            active: true,
        }
    }
}

/// Well-known account codes the posting orchestrators resolve.
///
/// A missing code for a tenant is a configuration error, not a data error.
pub mod codes {
    pub const CASH: &str = "A-1000";
    pub const ACCOUNTS_RECEIVABLE: &str = "A-1100";
    pub const INVENTORY: &str = "A-1200";
    pub const SALES_TAX_PAYABLE: &str = "L-2100";
    pub const SALES_REVENUE: &str = "R-4000";
    pub const SALES_DISCOUNT: &str = "R-4100";
    pub const COST_OF_GOODS_SOLD: &str = "C-5000";
}

/// Tenant-scoped chart-of-accounts lookup.
pub trait ChartOfAccounts: Send + Sync {
    /// Account by code, `None` when not configured for the tenant.
    fn account(&self, tenant_id: TenantId, code: &str) -> Option<Account>;
}

impl<C> ChartOfAccounts for std::sync::Arc<C>
where
    C: ChartOfAccounts + ?Sized,
{
    fn account(&self, tenant_id: TenantId, code: &str) -> Option<Account> {
        (**self).account(tenant_id, code)
    }
}

/// Resolve a required account, failing fast with the standard
/// "`<Name>` account (`<code>`) not found" configuration error.
///
/// `name` is the business name used in the error when the account is absent;
/// an inactive account is treated the same as a missing one.
pub fn require_account<C: ChartOfAccounts>(
    chart: &C,
    tenant_id: TenantId,
    code: &str,
    name: &str,
) -> PostingResult<Account> {
    match chart.account(tenant_id, code) {
        Some(account) if account.active => Ok(account),
        _ => Err(PostingError::account_not_found(name, code)),
    }
}
