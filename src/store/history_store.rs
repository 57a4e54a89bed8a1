use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::RwLock;

use crate::models::{AccountId, ConversionRecord, TransferRecord};

/// Append-only sink for transfer and conversion records. Engines take an
/// injected implementation; nothing here touches balances.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransferHistory: Send + Sync {
    async fn record_transfer(&self, record: TransferRecord);

    async fn record_conversion(&self, record: ConversionRecord);

    /// Records that debited or credited the account, oldest first.
    async fn transfers_for_account(&self, account_id: AccountId) -> Vec<TransferRecord>;

    /// Committed conversions for a holding, oldest first.
    async fn conversions_for_holding(&self, holding_id: AccountId) -> Vec<ConversionRecord>;

    async fn all_transfers(&self) -> Vec<TransferRecord>;
}

/// In-memory history, ordered by append time.
#[derive(Default)]
pub struct InMemoryHistory {
    transfers: RwLock<Vec<TransferRecord>>,
    conversions: RwLock<Vec<ConversionRecord>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransferHistory for InMemoryHistory {
    async fn record_transfer(&self, record: TransferRecord) {
        self.transfers.write().await.push(record);
    }

    async fn record_conversion(&self, record: ConversionRecord) {
        self.conversions.write().await.push(record);
    }

    async fn transfers_for_account(&self, account_id: AccountId) -> Vec<TransferRecord> {
        self.transfers
            .read()
            .await
            .iter()
            .filter(|r| r.touches(account_id))
            .cloned()
            .collect()
    }

    async fn conversions_for_holding(&self, holding_id: AccountId) -> Vec<ConversionRecord> {
        self.conversions
            .read()
            .await
            .iter()
            .filter(|r| r.holding_id == holding_id)
            .cloned()
            .collect()
    }

    async fn all_transfers(&self) -> Vec<TransferRecord> {
        self.transfers.read().await.clone()
    }
}
