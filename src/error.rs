use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::AccountId;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors reported by the ledger core. Every failure leaves account
/// balances exactly as they were before the call.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    #[error("account '{0}' not found")]
    UnknownAccount(AccountId),

    #[error("source and destination are the same account '{0}'")]
    SameAccount(AccountId),

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("timed out waiting for exclusive access to account '{0}'")]
    LockTimeout(AccountId),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Returns true for failures a caller could resolve by retrying later
    /// (contention), as opposed to failures of the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::LockTimeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = AppError::InsufficientBalance {
            requested: dec!(150),
            available: dec!(100),
        };
        assert_eq!(
            err.to_string(),
            "insufficient balance: requested 150, available 100"
        );

        let err = AppError::SameAccount(7);
        assert_eq!(
            err.to_string(),
            "source and destination are the same account '7'"
        );
    }

    #[test]
    fn test_is_transient() {
        assert!(AppError::LockTimeout(1).is_transient());
        assert!(!AppError::UnknownAccount(1).is_transient());
        assert!(!AppError::InvalidQuantity(dec!(0)).is_transient());
    }
}
