pub mod account;
pub mod balance;
pub mod conversion_record;
pub mod transfer_record;

pub use account::{Account, AccountId, AccountKind, Location, UserId, VendorId};
pub use balance::AccountBalance;
pub use conversion_record::ConversionRecord;
pub use transfer_record::{TransferRecord, TransferStatus};
