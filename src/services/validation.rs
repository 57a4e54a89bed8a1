use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::{AppError, Result};
use crate::models::AccountId;
use crate::store::BalanceStore;

/// Precondition checks for a transfer request. No side effects; balances
/// are never read, only the account directory.
pub struct TransferValidator {
    store: Arc<BalanceStore>,
}

impl TransferValidator {
    pub fn new(store: Arc<BalanceStore>) -> Self {
        Self { store }
    }

    /// Checks, in order: positive quantity, distinct accounts, both ids
    /// resolve, both accounts hold the same kind of balance. The distinct
    /// check comes before resolution so a self-transfer reports
    /// `SameAccount` even for an id that does not exist.
    pub async fn validate(
        &self,
        source_id: AccountId,
        destination_id: AccountId,
        quantity: Decimal,
    ) -> Result<()> {
        if quantity <= Decimal::ZERO {
            return Err(AppError::InvalidQuantity(quantity));
        }

        if source_id == destination_id {
            return Err(AppError::SameAccount(source_id));
        }

        let source = self.store.account(source_id).await?;
        let destination = self.store.account(destination_id).await?;

        if !source.same_kind(&destination) {
            return Err(AppError::Validation(format!(
                "cannot transfer between account '{}' and '{}': accounts hold different kinds of balance",
                source_id, destination_id
            )));
        }

        Ok(())
    }
}
