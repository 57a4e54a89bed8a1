use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::AccountId;

/// The quantity of gold held by an account. Invariant: `quantity >= 0`,
/// enforced by `debit`. Mutated only while the owning store's per-account
/// lock is held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub quantity: Decimal,
    /// Incremented on every mutation.
    pub version: i32,
    pub last_updated: DateTime<Utc>,
}

impl AccountBalance {
    /// Creates a balance at zero.
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            quantity: Decimal::ZERO,
            version: 1,
            last_updated: Utc::now(),
        }
    }

    /// Creates a balance with an initial quantity.
    pub fn with_quantity(account_id: AccountId, quantity: Decimal) -> Self {
        Self {
            account_id,
            quantity,
            version: 1,
            last_updated: Utc::now(),
        }
    }

    pub fn has_sufficient(&self, amount: Decimal) -> bool {
        self.quantity >= amount
    }

    /// Adds to the balance. Fails on arithmetic overflow, in which case the
    /// balance is left untouched.
    pub fn credit(&mut self, amount: Decimal) -> Result<()> {
        let updated = self.quantity.checked_add(amount).ok_or_else(|| {
            AppError::Validation(format!(
                "crediting {} to account '{}' overflows its balance",
                amount, self.account_id
            ))
        })?;
        self.quantity = updated;
        self.touch();
        Ok(())
    }

    /// Subtracts from the balance, failing without mutation when the
    /// amount exceeds the current quantity.
    pub fn debit(&mut self, amount: Decimal) -> Result<()> {
        if !self.has_sufficient(amount) {
            return Err(AppError::InsufficientBalance {
                requested: amount,
                available: self.quantity,
            });
        }
        self.quantity -= amount;
        self.touch();
        Ok(())
    }

    /// Overwrites the quantity. Used only to roll a balance back to a value
    /// it previously held within the same locked operation.
    pub fn restore(&mut self, quantity: Decimal) {
        self.quantity = quantity;
        self.touch();
    }

    fn touch(&mut self) {
        self.version += 1;
        self.last_updated = Utc::now();
    }
}
