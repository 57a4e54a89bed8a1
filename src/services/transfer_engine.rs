use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{AccountId, TransferRecord};
use crate::services::TransferValidator;
use crate::store::{BalanceStore, TransferHistory};

/// Moves quantity between two accounts of the same kind, all or nothing.
/// Both per-account locks are held for the whole mutation, acquired in
/// ascending id order.
pub struct TransferEngine {
    store: Arc<BalanceStore>,
    history: Arc<dyn TransferHistory>,
    validator: TransferValidator,
}

impl TransferEngine {
    pub fn new(store: Arc<BalanceStore>, history: Arc<dyn TransferHistory>) -> Self {
        Self {
            validator: TransferValidator::new(Arc::clone(&store)),
            store,
            history,
        }
    }

    /// Transfers `quantity` from `source_id` to `destination_id`. On
    /// success returns the committed record; any failure leaves both
    /// balances as they were before the call. Execution failures append a
    /// `Failed` record, validation failures append nothing.
    pub async fn transfer(
        &self,
        source_id: AccountId,
        destination_id: AccountId,
        quantity: Decimal,
    ) -> Result<TransferRecord> {
        self.validator
            .validate(source_id, destination_id, quantity)
            .await?;

        let (mut source, mut destination) =
            self.store.lock_pair(source_id, destination_id).await?;

        let source_before = source.quantity;
        if let Err(err) = source.debit(quantity) {
            drop(source);
            drop(destination);
            warn!(source_id, destination_id, %quantity, %err, "transfer failed at debit");
            self.history
                .record_transfer(TransferRecord::failed(source_id, destination_id, quantity))
                .await;
            return Err(err);
        }

        // Guarded credit: cannot fail after a successful debit unless the
        // destination balance would overflow. Roll the debit back before
        // releasing either lock so no intermediate state is readable.
        if let Err(err) = destination.credit(quantity) {
            source.restore(source_before);
            drop(source);
            drop(destination);
            warn!(source_id, destination_id, %quantity, %err, "transfer rolled back at credit");
            self.history
                .record_transfer(TransferRecord::failed(source_id, destination_id, quantity))
                .await;
            return Err(err);
        }

        let record = TransferRecord::committed(source_id, destination_id, quantity);
        self.history.record_transfer(record.clone()).await;
        info!(
            source_id,
            destination_id,
            %quantity,
            transfer_id = %record.id,
            "transfer committed"
        );
        Ok(record)
    }
}
