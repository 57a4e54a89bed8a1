pub mod balance_store;
pub mod history_store;

pub use balance_store::BalanceStore;
pub use history_store::{InMemoryHistory, TransferHistory};
