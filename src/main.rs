use std::sync::Arc;

use gold_ledger::config::Settings;
use gold_ledger::models::Location;
use gold_ledger::observability::{init_logging, LogConfig};
use gold_ledger::services::{
    AccountService, ConversionEngine, CreateBranchRequest, CreateHoldingRequest, TransferEngine,
};
use gold_ledger::store::{BalanceStore, InMemoryHistory};
use rust_decimal::Decimal;
use tracing::info;

/// Startup verification: wires the ledger together, seeds a small demo
/// directory, and runs one transfer and one conversion end to end.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new()?;

    init_logging(&LogConfig {
        level: settings.application.log_level.clone(),
        format: settings.application.log_format.as_str().into(),
    });
    info!("Configuration loaded");

    let store = Arc::new(BalanceStore::new(settings.engine.lock_wait()));
    let history = Arc::new(InMemoryHistory::new());
    let accounts = AccountService::new(Arc::clone(&store), history.clone());
    let transfers = TransferEngine::new(Arc::clone(&store), history.clone());
    let conversions = ConversionEngine::new(Arc::clone(&store), history.clone());

    let mumbai = accounts
        .create_branch(CreateBranchRequest {
            vendor_id: 1,
            location: Location::new("Mumbai", "Maharashtra", "India"),
            opening_stock: Decimal::from(500),
            metadata: None,
        })
        .await?;
    let pune = accounts
        .create_branch(CreateBranchRequest {
            vendor_id: 1,
            location: Location::new("Pune", "Maharashtra", "India"),
            opening_stock: Decimal::from(200),
            metadata: None,
        })
        .await?;
    let holding = accounts
        .create_holding(CreateHoldingRequest {
            user_id: 1,
            branch_id: mumbai.id,
            opening_quantity: Decimal::from(10),
            metadata: None,
        })
        .await?;
    info!(
        branches = 2,
        holdings = 1,
        "Demo ledger seeded"
    );

    let record = transfers
        .transfer(mumbai.id, pune.id, Decimal::from(50))
        .await?;
    info!(transfer_id = %record.id, "Branch transfer verified");

    let record = conversions.convert(holding.id).await?;
    info!(conversion_id = %record.id, "Virtual-to-physical conversion verified");

    info!(
        mumbai = %store.get(mumbai.id).await?,
        pune = %store.get(pune.id).await?,
        holding = %store.get(holding.id).await?,
        "Startup verification complete: ledger operational"
    );

    Ok(())
}
