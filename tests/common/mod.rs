use std::sync::Arc;
use std::time::Duration;

use gold_ledger::models::{Account, AccountId, Location};
use gold_ledger::services::{AccountService, ConversionEngine, TransferEngine};
use gold_ledger::store::{BalanceStore, InMemoryHistory};
use rust_decimal::Decimal;

/// Everything a test needs, wired the way the binary wires it.
pub struct TestLedger {
    pub store: Arc<BalanceStore>,
    pub history: Arc<InMemoryHistory>,
    pub accounts: AccountService,
    pub transfers: Arc<TransferEngine>,
    pub conversions: ConversionEngine,
}

impl TestLedger {
    pub fn new() -> Self {
        Self::with_lock_wait(Duration::from_millis(1000))
    }

    pub fn with_lock_wait(lock_wait: Duration) -> Self {
        let store = Arc::new(BalanceStore::new(lock_wait));
        let history = Arc::new(InMemoryHistory::new());
        Self {
            accounts: AccountService::new(Arc::clone(&store), history.clone()),
            transfers: Arc::new(TransferEngine::new(Arc::clone(&store), history.clone())),
            conversions: ConversionEngine::new(Arc::clone(&store), history.clone()),
            store,
            history,
        }
    }

    /// Registers a branch with the given opening stock directly against
    /// the store, with a fixed location.
    pub async fn seed_branch(&self, id: AccountId, stock: Decimal) -> Account {
        let branch = Account::branch(id, 1, Location::new("Mumbai", "Maharashtra", "India"));
        self.store
            .insert_account(branch.clone(), stock)
            .await
            .expect("failed to seed branch");
        branch
    }

    /// Registers a holding for a user against an existing branch.
    pub async fn seed_holding(&self, id: AccountId, branch_id: AccountId, quantity: Decimal) -> Account {
        let holding = Account::holding(id, 42, branch_id);
        self.store
            .insert_account(holding.clone(), quantity)
            .await
            .expect("failed to seed holding");
        holding
    }

    pub async fn quantity(&self, id: AccountId) -> Decimal {
        self.store.get(id).await.expect("failed to read balance")
    }
}
