use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{
    Account, AccountId, ConversionRecord, Location, TransferRecord, UserId, VendorId,
};
use crate::store::{BalanceStore, TransferHistory};

/// Request to register a vendor branch with its opening gold stock.
#[derive(Debug, Clone)]
pub struct CreateBranchRequest {
    pub vendor_id: VendorId,
    pub location: Location,
    pub opening_stock: Decimal,
    pub metadata: Option<serde_json::Value>,
}

/// Request to register a user's virtual holding against a backing branch.
#[derive(Debug, Clone)]
pub struct CreateHoldingRequest {
    pub user_id: UserId,
    pub branch_id: AccountId,
    pub opening_quantity: Decimal,
    pub metadata: Option<serde_json::Value>,
}

/// Registration, updates, and lookups over the account directory.
pub struct AccountService {
    store: Arc<BalanceStore>,
    history: Arc<dyn TransferHistory>,
}

impl AccountService {
    pub fn new(store: Arc<BalanceStore>, history: Arc<dyn TransferHistory>) -> Self {
        Self { store, history }
    }

    pub async fn create_branch(&self, request: CreateBranchRequest) -> Result<Account> {
        if request.opening_stock < Decimal::ZERO {
            return Err(AppError::InvalidQuantity(request.opening_stock));
        }

        let id = self.store.allocate_id();
        let mut branch = Account::branch(id, request.vendor_id, request.location);
        if let Some(metadata) = request.metadata {
            branch = branch.with_metadata(metadata);
        }
        self.store
            .insert_account(branch.clone(), request.opening_stock)
            .await?;
        info!(branch_id = id, vendor_id = request.vendor_id, "branch registered");
        Ok(branch)
    }

    pub async fn create_holding(&self, request: CreateHoldingRequest) -> Result<Account> {
        if request.opening_quantity < Decimal::ZERO {
            return Err(AppError::InvalidQuantity(request.opening_quantity));
        }

        // The backing branch must already exist.
        self.branch(request.branch_id).await?;

        let id = self.store.allocate_id();
        let mut holding = Account::holding(id, request.user_id, request.branch_id);
        if let Some(metadata) = request.metadata {
            holding = holding.with_metadata(metadata);
        }
        self.store
            .insert_account(holding.clone(), request.opening_quantity)
            .await?;
        info!(holding_id = id, user_id = request.user_id, "holding registered");
        Ok(holding)
    }

    /// Replaces a branch's vendor and location. The balance is untouched.
    pub async fn update_branch(
        &self,
        branch_id: AccountId,
        vendor_id: VendorId,
        location: Location,
    ) -> Result<Account> {
        let existing = self.branch(branch_id).await?;

        let mut updated = Account::branch(branch_id, vendor_id, location);
        updated.metadata = existing.metadata;
        updated.created_at = existing.created_at;
        self.store.update_account(updated.clone()).await?;
        Ok(updated)
    }

    /// Re-links a holding to another user or backing branch.
    pub async fn update_holding(
        &self,
        holding_id: AccountId,
        user_id: UserId,
        branch_id: AccountId,
    ) -> Result<Account> {
        let existing = self.holding(holding_id).await?;
        self.branch(branch_id).await?;

        let mut updated = Account::holding(holding_id, user_id, branch_id);
        updated.metadata = existing.metadata;
        updated.created_at = existing.created_at;
        self.store.update_account(updated.clone()).await?;
        Ok(updated)
    }

    /// Resolves an id to a branch account; ids that resolve to holdings
    /// report `UnknownAccount`, branch and holding ids being distinct
    /// namespaces to callers.
    pub async fn branch(&self, branch_id: AccountId) -> Result<Account> {
        let account = self.store.account(branch_id).await?;
        if !account.is_branch() {
            return Err(AppError::UnknownAccount(branch_id));
        }
        Ok(account)
    }

    pub async fn holding(&self, holding_id: AccountId) -> Result<Account> {
        let account = self.store.account(holding_id).await?;
        if !account.is_holding() {
            return Err(AppError::UnknownAccount(holding_id));
        }
        Ok(account)
    }

    pub async fn all_branches(&self) -> Vec<Account> {
        self.store
            .accounts()
            .await
            .into_iter()
            .filter(Account::is_branch)
            .collect()
    }

    pub async fn all_holdings(&self) -> Vec<Account> {
        self.store
            .accounts()
            .await
            .into_iter()
            .filter(Account::is_holding)
            .collect()
    }

    pub async fn branches_by_vendor(&self, vendor_id: VendorId) -> Vec<Account> {
        self.all_branches()
            .await
            .into_iter()
            .filter(|b| b.vendor_id() == Some(vendor_id))
            .collect()
    }

    pub async fn branches_by_city(&self, city: &str) -> Vec<Account> {
        self.branches_by_location(|l| l.city.eq_ignore_ascii_case(city))
            .await
    }

    pub async fn branches_by_state(&self, state: &str) -> Vec<Account> {
        self.branches_by_location(|l| l.state.eq_ignore_ascii_case(state))
            .await
    }

    pub async fn branches_by_country(&self, country: &str) -> Vec<Account> {
        self.branches_by_location(|l| l.country.eq_ignore_ascii_case(country))
            .await
    }

    pub async fn holdings_by_user(&self, user_id: UserId) -> Vec<Account> {
        self.all_holdings()
            .await
            .into_iter()
            .filter(|h| h.user_id() == Some(user_id))
            .collect()
    }

    /// Holdings of a user whose backing branch belongs to the vendor.
    pub async fn holdings_by_user_and_vendor(
        &self,
        user_id: UserId,
        vendor_id: VendorId,
    ) -> Vec<Account> {
        let mut matched = Vec::new();
        for holding in self.holdings_by_user(user_id).await {
            let Some(branch_id) = holding.linked_branch() else {
                continue;
            };
            if let Ok(branch) = self.store.account(branch_id).await {
                if branch.vendor_id() == Some(vendor_id) {
                    matched.push(holding);
                }
            }
        }
        matched
    }

    /// All transfer records that debited or credited the branch.
    pub async fn branch_transactions(&self, branch_id: AccountId) -> Result<Vec<TransferRecord>> {
        self.branch(branch_id).await?;
        Ok(self.history.transfers_for_account(branch_id).await)
    }

    /// Committed conversions out of the holding.
    pub async fn holding_conversions(
        &self,
        holding_id: AccountId,
    ) -> Result<Vec<ConversionRecord>> {
        self.holding(holding_id).await?;
        Ok(self.history.conversions_for_holding(holding_id).await)
    }

    /// Current quantity held by any account.
    pub async fn quantity(&self, account_id: AccountId) -> Result<Decimal> {
        self.store.get(account_id).await
    }

    async fn branches_by_location<F>(&self, matches: F) -> Vec<Account>
    where
        F: Fn(&Location) -> bool,
    {
        self.all_branches()
            .await
            .into_iter()
            .filter(|b| b.location().map(&matches).unwrap_or(false))
            .collect()
    }
}
