use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AccountId;

/// Immutable history entry for a virtual-to-physical conversion.
/// Appended only when the conversion commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub id: Uuid,
    pub holding_id: AccountId,
    pub branch_id: AccountId,
    pub quantity: Decimal,
    pub created_at: DateTime<Utc>,
}

impl ConversionRecord {
    pub fn new(holding_id: AccountId, branch_id: AccountId, quantity: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            holding_id,
            branch_id,
            quantity,
            created_at: Utc::now(),
        }
    }
}
