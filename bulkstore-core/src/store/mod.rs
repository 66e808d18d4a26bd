/*
    Store subsystem - bulk-indexed message array
*/

pub mod errors;
pub mod gas;
pub mod message_store;
pub mod search;
pub mod sparse_array;
pub mod stats;

pub use errors::*;
pub use gas::{GasSchedule, OperationType};
pub use message_store::{
    MessageStore, MessageStoreConfig, Snapshot, StoreLimits, StoreState, DEFAULT_GREETING,
    DEFAULT_MAX_LENGTH,
};
pub use search::SearchMode;
pub use sparse_array::SparseArray;
pub use stats::MessageStats;
