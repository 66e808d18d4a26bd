/*
    errors.rs - Error types for the message store

    Every rejected precondition of a bulk operation maps to one of:
    - InvalidCount (empty batch or batch over the configured cap)
    - IndexOutOfRange (index past the end, or an inverted/overlong range)
    - LengthMismatch (paired index/message lists of different sizes)
*/

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the store subsystem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Batch is empty or larger than the cap for this operation
    #[error("Invalid {operation} count: {count} (allowed 1..={max})")]
    InvalidCount {
        operation: &'static str,
        count: usize,
        max: usize,
    },

    /// Index is not below the current length
    #[error("Index out of range: {index} (length {length})")]
    IndexOutOfRange { index: usize, length: usize },

    /// Range end past the array or start after end
    #[error("Invalid range: [{start}, {end}] (length {length})")]
    InvalidRange {
        start: usize,
        end: usize,
        length: usize,
    },

    /// Paired lists differ in size
    #[error("Length mismatch: {indices} indices, {messages} messages")]
    LengthMismatch { indices: usize, messages: usize },

    /// Gas estimation asked for an unknown operation code
    #[error("Invalid operation type: {0}")]
    InvalidOperationType(u64),

    /// A writer panicked while holding the state lock
    #[error("Lock poisoned: a thread panicked while holding the store lock")]
    LockPoisoned,
}

/// Coarse classification of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidCount,
    IndexOutOfRange,
    LengthMismatch,
    InvalidOperationType,
    Internal,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InvalidCount { .. } => ErrorKind::InvalidCount,
            StoreError::IndexOutOfRange { .. } | StoreError::InvalidRange { .. } => {
                ErrorKind::IndexOutOfRange
            }
            StoreError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            StoreError::InvalidOperationType(_) => ErrorKind::InvalidOperationType,
            StoreError::LockPoisoned => ErrorKind::Internal,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_err: std::sync::PoisonError<T>) -> Self {
        StoreError::LockPoisoned
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
