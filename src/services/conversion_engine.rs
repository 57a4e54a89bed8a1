use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::{AccountId, ConversionRecord};
use crate::store::{BalanceStore, TransferHistory};

/// Converts virtual gold into physical stock: debits a user's holding and
/// credits the branch backing it, with the same all-or-nothing locking as
/// the transfer engine. The destination is always the holding's linked
/// branch.
pub struct ConversionEngine {
    store: Arc<BalanceStore>,
    history: Arc<dyn TransferHistory>,
}

impl ConversionEngine {
    pub fn new(store: Arc<BalanceStore>, history: Arc<dyn TransferHistory>) -> Self {
        Self { store, history }
    }

    /// Converts the holding's entire current quantity. A holding already at
    /// zero fails with `InsufficientBalance` rather than committing an
    /// empty conversion.
    pub async fn convert(&self, holding_id: AccountId) -> Result<ConversionRecord> {
        self.execute(holding_id, None).await
    }

    /// Converts a specified amount of the holding.
    pub async fn convert_amount(
        &self,
        holding_id: AccountId,
        quantity: Decimal,
    ) -> Result<ConversionRecord> {
        if quantity <= Decimal::ZERO {
            return Err(AppError::InvalidQuantity(quantity));
        }
        self.execute(holding_id, Some(quantity)).await
    }

    async fn execute(
        &self,
        holding_id: AccountId,
        quantity: Option<Decimal>,
    ) -> Result<ConversionRecord> {
        let holding = self.store.account(holding_id).await?;
        let branch_id = holding.linked_branch().ok_or_else(|| {
            AppError::Validation(format!(
                "account '{holding_id}' is not a virtual holding"
            ))
        })?;

        let branch = self.store.account(branch_id).await?;
        if !branch.is_branch() {
            return Err(AppError::Validation(format!(
                "linked account '{branch_id}' of holding '{holding_id}' is not a branch"
            )));
        }

        let (mut held, mut stock) = self.store.lock_pair(holding_id, branch_id).await?;

        // Full conversion resolves the amount under the lock so a racing
        // operation cannot change it between read and debit.
        let amount = quantity.unwrap_or(held.quantity);
        if amount <= Decimal::ZERO {
            return Err(AppError::InsufficientBalance {
                requested: amount,
                available: held.quantity,
            });
        }

        let held_before = held.quantity;
        held.debit(amount)?;

        if let Err(err) = stock.credit(amount) {
            held.restore(held_before);
            drop(held);
            drop(stock);
            warn!(holding_id, branch_id, %amount, %err, "conversion rolled back at credit");
            return Err(err);
        }

        let record = ConversionRecord::new(holding_id, branch_id, amount);
        self.history.record_conversion(record.clone()).await;
        info!(
            holding_id,
            branch_id,
            %amount,
            conversion_id = %record.id,
            "conversion committed"
        );
        Ok(record)
    }
}
