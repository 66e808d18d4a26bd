//! BulkStore: a bulk-indexed append/sparse message array with search and
//! statistics, driven through a serialized ledger client.

pub mod config;
pub mod ledger;
pub mod logging;
pub mod metrics;
pub mod store;
pub mod test_utils;

pub use config::Config;
pub use ledger::{Call, CallOutput, LedgerClient, LocalLedger, Receipt};
pub use logging::{init_logging, LogLevel};
pub use store::{MessageStore, StoreError, StoreResult};
