pub mod account_service;
pub mod conversion_engine;
pub mod transfer_engine;
pub mod validation;

pub use account_service::{AccountService, CreateBranchRequest, CreateHoldingRequest};
pub use conversion_engine::ConversionEngine;
pub use transfer_engine::TransferEngine;
pub use validation::TransferValidator;
