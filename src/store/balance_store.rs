use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::timeout;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{Account, AccountBalance, AccountId};

struct AccountEntry {
    account: Account,
    balance: Arc<Mutex<AccountBalance>>,
}

/// Sole owner of every account's quantity. Each account gets its own async
/// mutex; all mutation happens under that mutex, and waiting for it is
/// bounded so contention surfaces as `LockTimeout` instead of an unbounded
/// stall.
pub struct BalanceStore {
    accounts: RwLock<HashMap<AccountId, AccountEntry>>,
    next_id: AtomicU32,
    lock_wait: Duration,
}

impl BalanceStore {
    pub fn new(lock_wait: Duration) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            next_id: AtomicU32::new(1),
            lock_wait,
        }
    }

    /// Hands out the next free account id.
    pub fn allocate_id(&self) -> AccountId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Adds an account with its opening balance. The id must be unused and
    /// the opening quantity non-negative.
    pub async fn insert_account(&self, account: Account, opening: Decimal) -> Result<()> {
        if opening < Decimal::ZERO {
            return Err(AppError::InvalidQuantity(opening));
        }
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) {
            return Err(AppError::Validation(format!(
                "account '{}' already exists",
                account.id
            )));
        }
        let balance = AccountBalance::with_quantity(account.id, opening);
        debug!(account_id = account.id, %opening, "account registered");
        accounts.insert(
            account.id,
            AccountEntry {
                account,
                balance: Arc::new(Mutex::new(balance)),
            },
        );
        Ok(())
    }

    /// Replaces the directory entry for an existing account. The balance
    /// and its lock are untouched.
    pub async fn update_account(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let entry = accounts
            .get_mut(&account.id)
            .ok_or(AppError::UnknownAccount(account.id))?;
        entry.account = account;
        Ok(())
    }

    /// Returns the directory entry for an account.
    pub async fn account(&self, id: AccountId) -> Result<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .get(&id)
            .map(|entry| entry.account.clone())
            .ok_or(AppError::UnknownAccount(id))
    }

    /// Returns all accounts, ordered by id.
    pub async fn accounts(&self) -> Vec<Account> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().map(|e| e.account.clone()).collect();
        all.sort_by_key(|a| a.id);
        all
    }

    /// Current quantity of an account.
    pub async fn get(&self, id: AccountId) -> Result<Decimal> {
        Ok(self.lock_one(id).await?.quantity)
    }

    /// Snapshot of an account's balance.
    pub async fn balance(&self, id: AccountId) -> Result<AccountBalance> {
        Ok(self.lock_one(id).await?.clone())
    }

    /// Subtracts `quantity` from the account, failing without mutation when
    /// the balance is insufficient. Serialized against all other calls on
    /// the same account.
    pub async fn debit(&self, id: AccountId, quantity: Decimal) -> Result<AccountBalance> {
        let mut guard = self.lock_one(id).await?;
        guard.debit(quantity)?;
        Ok(guard.clone())
    }

    /// Adds `quantity` to the account. Serialized against all other calls
    /// on the same account.
    pub async fn credit(&self, id: AccountId, quantity: Decimal) -> Result<AccountBalance> {
        let mut guard = self.lock_one(id).await?;
        guard.credit(quantity)?;
        Ok(guard.clone())
    }

    /// Acquires exclusive access to one account, bounded by the configured
    /// wait.
    pub async fn lock_one(&self, id: AccountId) -> Result<OwnedMutexGuard<AccountBalance>> {
        let handle = self.balance_handle(id).await?;
        timeout(self.lock_wait, handle.lock_owned())
            .await
            .map_err(|_| AppError::LockTimeout(id))
    }

    /// Acquires exclusive access to two distinct accounts, always locking
    /// the lower id first so opposite-direction pairs cannot deadlock.
    /// Guards come back in (first, second) argument order.
    pub async fn lock_pair(
        &self,
        first: AccountId,
        second: AccountId,
    ) -> Result<(OwnedMutexGuard<AccountBalance>, OwnedMutexGuard<AccountBalance>)> {
        debug_assert_ne!(first, second);
        let lo = first.min(second);
        let hi = first.max(second);

        // If the second acquisition times out the first guard is dropped
        // here, releasing the account.
        let lo_guard = self.lock_one(lo).await?;
        let hi_guard = self.lock_one(hi).await?;

        if first == lo {
            Ok((lo_guard, hi_guard))
        } else {
            Ok((hi_guard, lo_guard))
        }
    }

    async fn balance_handle(&self, id: AccountId) -> Result<Arc<Mutex<AccountBalance>>> {
        let accounts = self.accounts.read().await;
        accounts
            .get(&id)
            .map(|entry| Arc::clone(&entry.balance))
            .ok_or(AppError::UnknownAccount(id))
    }
}

impl Default for BalanceStore {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}
