use std::collections::HashMap;
use std::sync::RwLock;

use ledgerpost_core::TenantId;
use ledgerpost_journal::{Account, AccountKind, ChartOfAccounts, codes};

/// In-memory chart of accounts.
///
/// Intended for tests/dev; tenant setup owns the real chart.
#[derive(Debug, Default)]
pub struct InMemoryChartOfAccounts {
    accounts: RwLock<HashMap<(TenantId, String), Account>>,
}

impl InMemoryChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, tenant_id: TenantId, account: Account) {
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.insert((tenant_id, account.code.clone()), account);
        }
    }

    pub fn remove(&self, tenant_id: TenantId, code: &str) {
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.remove(&(tenant_id, code.to_string()));
        }
    }

    /// Seed the well-known accounts every orchestrator resolves.
    pub fn seed_defaults(&self, tenant_id: TenantId) {
        let defaults = [
            Account::new(codes::CASH, "Cash", AccountKind::Asset),
            Account::new(codes::ACCOUNTS_RECEIVABLE, "Accounts Receivable", AccountKind::Asset),
            Account::new(codes::INVENTORY, "Inventory", AccountKind::Asset),
            Account::new(codes::SALES_TAX_PAYABLE, "Sales Tax Payable", AccountKind::Liability),
            Account::new(codes::SALES_REVENUE, "Sales Revenue", AccountKind::Revenue),
            Account::new(codes::SALES_DISCOUNT, "Sales Discount", AccountKind::Revenue),
            Account::new(codes::COST_OF_GOODS_SOLD, "Cost of Goods Sold", AccountKind::Expense),
        ];
        for account in defaults {
            self.upsert(tenant_id, account);
        }
    }
}

impl ChartOfAccounts for InMemoryChartOfAccounts {
    fn account(&self, tenant_id: TenantId, code: &str) -> Option<Account> {
        let accounts = self.accounts.read().ok()?;
        accounts.get(&(tenant_id, code.to_string())).cloned()
    }
}
