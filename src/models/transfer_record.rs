use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AccountId;

/// Outcome of a transfer attempt that reached execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Committed,
    Failed,
}

/// Immutable history entry for a transfer attempt. Validation failures
/// never produce a record; execution failures produce a `Failed` one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: Uuid,
    pub source_id: AccountId,
    pub destination_id: AccountId,
    pub quantity: Decimal,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    pub fn committed(source_id: AccountId, destination_id: AccountId, quantity: Decimal) -> Self {
        Self::with_status(source_id, destination_id, quantity, TransferStatus::Committed)
    }

    pub fn failed(source_id: AccountId, destination_id: AccountId, quantity: Decimal) -> Self {
        Self::with_status(source_id, destination_id, quantity, TransferStatus::Failed)
    }

    fn with_status(
        source_id: AccountId,
        destination_id: AccountId,
        quantity: Decimal,
        status: TransferStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
            destination_id,
            quantity,
            status,
            created_at: Utc::now(),
        }
    }

    pub fn is_committed(&self) -> bool {
        self.status == TransferStatus::Committed
    }

    /// True if the record debited or credited the given account.
    pub fn touches(&self, account_id: AccountId) -> bool {
        self.source_id == account_id || self.destination_id == account_id
    }
}
