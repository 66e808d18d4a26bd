/*
    message_store.rs - Bulk-indexed message store

    Holds the sparse message array and the single greeting slot, and exposes
    the bulk read/write/search/statistics operations.

    Concurrency:
    - One writer at a time (RwLock write guard)
    - Writers mutate copy-on-write (Arc::make_mut), so a reader holding a
      Snapshot keeps a consistent view and is never blocked by a writer
    - Readers hold the read guard only long enough to clone the Arc

    Atomicity:
    - Every mutating batch is fully validated before any slot is touched,
      so a rejected call leaves no observable change
*/

use super::errors::{StoreError, StoreResult};
use super::gas::{GasSchedule, OperationType};
use super::search::{find_matches, SearchMode};
use super::sparse_array::SparseArray;
use super::stats::MessageStats;
use crate::metrics::Timer;
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Default greeting held by a fresh store
pub const DEFAULT_GREETING: &str = "Hello, World!";

/// Default cap on the array length
pub const DEFAULT_MAX_LENGTH: usize = 1_000_000;

/// Batch size caps and the growth bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLimits {
    /// Largest batch accepted by store, store-at and remove
    pub max_store: usize,
    /// Largest batch accepted by get and range reads
    pub max_retrieve: usize,
    /// Writes may not grow the array past this many slots
    pub max_length: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        StoreLimits {
            max_store: 50,
            max_retrieve: 100,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Configuration for a message store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageStoreConfig {
    /// Largest batch accepted by store, store-at and remove
    pub max_store: usize,

    /// Largest batch accepted by get and range reads
    pub max_retrieve: usize,

    /// Highest slot count a write may grow the array to
    pub max_length: usize,

    /// Case policy used by `search`
    pub search_mode: SearchMode,

    /// Greeting returned by `get_message` until one is stored
    pub initial_message: String,
}

impl Default for MessageStoreConfig {
    fn default() -> Self {
        let limits = StoreLimits::default();
        MessageStoreConfig {
            max_store: limits.max_store,
            max_retrieve: limits.max_retrieve,
            max_length: limits.max_length,
            search_mode: SearchMode::default(),
            initial_message: DEFAULT_GREETING.to_string(),
        }
    }
}

impl MessageStoreConfig {
    pub fn limits(&self) -> StoreLimits {
        StoreLimits {
            max_store: self.max_store,
            max_retrieve: self.max_retrieve,
            max_length: self.max_length,
        }
    }
}

/// Everything the store persists between calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    pub messages: SparseArray<String>,
    pub greeting: String,
}

fn check_count(operation: &'static str, count: usize, max: usize) -> StoreResult<()> {
    if count == 0 || count > max {
        return Err(StoreError::InvalidCount {
            operation,
            count,
            max,
        });
    }
    Ok(())
}

fn check_indices(indices: &[usize], length: usize) -> StoreResult<()> {
    match indices.iter().find(|&&index| index >= length) {
        Some(&index) => Err(StoreError::IndexOutOfRange { index, length }),
        None => Ok(()),
    }
}

fn check_growth(highest: usize, limits: &StoreLimits) -> StoreResult<()> {
    if highest >= limits.max_length {
        return Err(StoreError::IndexOutOfRange {
            index: highest,
            length: limits.max_length,
        });
    }
    Ok(())
}

// Validation reads the current state only; the apply half cannot fail.
impl StoreState {
    fn check_store(&self, limits: &StoreLimits, count: usize) -> StoreResult<()> {
        check_count("store", count, limits.max_store)?;
        check_growth(self.messages.len().saturating_add(count - 1), limits)
    }

    fn check_store_at(
        &self,
        limits: &StoreLimits,
        indices: &[usize],
        message_count: usize,
    ) -> StoreResult<()> {
        if indices.len() != message_count {
            return Err(StoreError::LengthMismatch {
                indices: indices.len(),
                messages: message_count,
            });
        }
        check_count("store", indices.len(), limits.max_store)?;

        match indices.iter().copied().max() {
            Some(highest) if highest >= self.messages.len() => check_growth(highest, limits),
            _ => Ok(()),
        }
    }

    fn check_remove(&self, limits: &StoreLimits, indices: &[usize]) -> StoreResult<()> {
        check_count("remove", indices.len(), limits.max_store)?;
        check_indices(indices, self.messages.len())
    }

    fn append(&mut self, messages: Vec<String>) {
        for message in messages {
            self.messages.push(message);
        }
    }

    fn write_at(&mut self, indices: &[usize], messages: Vec<String>) {
        for (&index, message) in indices.iter().zip(messages) {
            self.messages.set(index, message);
        }
    }

    fn remove(&mut self, indices: &[usize]) {
        for &index in indices {
            self.messages.tombstone(index);
        }
    }
}

/// Immutable, consistent view of the store at one point in time
#[derive(Debug, Clone)]
pub struct Snapshot {
    state: Arc<StoreState>,
    limits: StoreLimits,
    search_mode: SearchMode,
}

impl Snapshot {
    /// Number of slots, tombstones included
    pub fn count(&self) -> usize {
        self.state.messages.len()
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    pub fn messages(&self) -> &SparseArray<String> {
        &self.state.messages
    }

    pub fn get_message(&self) -> &str {
        &self.state.greeting
    }

    /// Slot contents at each index, in request order
    pub fn bulk_get(&self, indices: &[usize]) -> StoreResult<Vec<String>> {
        check_count("retrieve", indices.len(), self.limits.max_retrieve)?;
        check_indices(indices, self.count())?;

        Ok(indices
            .iter()
            .filter_map(|&index| self.state.messages.get(index).cloned())
            .collect())
    }

    /// Slots `start..=end`
    pub fn get_range(&self, start: usize, end: usize) -> StoreResult<Vec<String>> {
        let length = self.count();
        if start > end || end >= length {
            return Err(StoreError::InvalidRange { start, end, length });
        }
        check_count("retrieve", end - start + 1, self.limits.max_retrieve)?;

        Ok(self.state.messages.as_slice()[start..=end].to_vec())
    }

    pub fn search(&self, term: &str, max_results: usize) -> Vec<usize> {
        self.search_with_mode(term, max_results, self.search_mode)
    }

    pub fn search_with_mode(&self, term: &str, max_results: usize, mode: SearchMode) -> Vec<usize> {
        find_matches(self.state.messages.iter(), term, max_results, mode)
    }

    pub fn get_stats(&self) -> MessageStats {
        MessageStats::compute(self.state.messages.iter())
    }

    /// Copy of the underlying state, for hosts that persist it
    pub fn to_state(&self) -> StoreState {
        StoreState::clone(&self.state)
    }
}

/// Bulk-indexed message store
pub struct MessageStore {
    config: MessageStoreConfig,
    gas: GasSchedule,
    state: RwLock<Arc<StoreState>>,
}

impl Default for MessageStore {
    fn default() -> Self {
        MessageStore::new(MessageStoreConfig::default(), GasSchedule::default())
    }
}

impl MessageStore {
    /// Create an empty store
    pub fn new(config: MessageStoreConfig, gas: GasSchedule) -> Self {
        let state = StoreState {
            messages: SparseArray::new(),
            greeting: config.initial_message.clone(),
        };
        MessageStore::from_state(config, gas, state)
    }

    /// Create a store over previously exported state
    pub fn from_state(config: MessageStoreConfig, gas: GasSchedule, state: StoreState) -> Self {
        MessageStore {
            config,
            gas,
            state: RwLock::new(Arc::new(state)),
        }
    }

    pub fn config(&self) -> &MessageStoreConfig {
        &self.config
    }

    pub fn gas_schedule(&self) -> &GasSchedule {
        &self.gas
    }

    /// Take a consistent read view
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        let state = self.state.read()?.clone();
        Ok(Snapshot {
            state,
            limits: self.config.limits(),
            search_mode: self.config.search_mode,
        })
    }

    /// Detached copy sharing the current state until either side writes
    pub fn fork(&self) -> StoreResult<MessageStore> {
        let state = self.state.read()?.clone();
        Ok(MessageStore {
            config: self.config.clone(),
            gas: self.gas,
            state: RwLock::new(state),
        })
    }

    /// Validate then apply a mutation under the writer lock
    fn mutate<V, A>(&self, operation: &'static str, validate: V, apply: A) -> StoreResult<()>
    where
        V: FnOnce(&StoreState, &StoreLimits) -> StoreResult<()>,
        A: FnOnce(&mut StoreState),
    {
        let limits = self.config.limits();
        let timer = Timer::new("store.operation.duration_ms");
        let mut guard = self.state.write()?;

        if let Err(err) = validate(&**guard, &limits) {
            drop(guard);
            timer.stop();
            warn!(operation, error = %err, "Rejected bulk operation");
            counter!("store.operations.rejected").increment(1);
            return Err(err);
        }

        // Clones only when a snapshot is still alive
        let state = Arc::make_mut(&mut guard);
        apply(state);

        let length = state.messages.len();
        let tombstones = state.messages.tombstone_count();
        drop(guard);
        timer.stop();

        counter!("store.operations.write").increment(1);
        gauge!("store.length").set(length as f64);
        gauge!("store.tombstones").set(tombstones as f64);
        debug!(operation, length, "Committed bulk operation");
        Ok(())
    }

    /// Append messages at the end of the array
    pub fn bulk_store(&self, messages: Vec<String>) -> StoreResult<()> {
        let count = messages.len();
        self.mutate(
            "bulk_store",
            |state, limits| state.check_store(limits, count),
            |state| state.append(messages),
        )?;
        info!(count, "Stored messages");
        Ok(())
    }

    /// Write `messages[k]` at `indices[k]`, extending the array as needed
    pub fn bulk_store_at(&self, indices: &[usize], messages: Vec<String>) -> StoreResult<()> {
        let message_count = messages.len();
        self.mutate(
            "bulk_store_at",
            |state, limits| state.check_store_at(limits, indices, message_count),
            |state| state.write_at(indices, messages),
        )?;
        info!(count = indices.len(), "Stored messages at indices");
        Ok(())
    }

    /// Tombstone each indexed slot
    pub fn bulk_remove(&self, indices: &[usize]) -> StoreResult<()> {
        self.mutate(
            "bulk_remove",
            |state, limits| state.check_remove(limits, indices),
            |state| state.remove(indices),
        )?;
        info!(count = indices.len(), "Removed messages");
        Ok(())
    }

    /// Replace the greeting slot
    pub fn store_message(&self, message: String) -> StoreResult<()> {
        self.mutate(
            "store_message",
            |_, _| Ok(()),
            |state| state.greeting = message,
        )
    }

    pub fn get_message(&self) -> StoreResult<String> {
        Ok(self.snapshot()?.get_message().to_string())
    }

    pub fn bulk_get(&self, indices: &[usize]) -> StoreResult<Vec<String>> {
        counter!("store.operations.read").increment(1);
        self.snapshot()?.bulk_get(indices)
    }

    pub fn get_range(&self, start: usize, end: usize) -> StoreResult<Vec<String>> {
        counter!("store.operations.read").increment(1);
        self.snapshot()?.get_range(start, end)
    }

    pub fn get_count(&self) -> StoreResult<usize> {
        Ok(self.snapshot()?.count())
    }

    pub fn get_limits(&self) -> StoreLimits {
        self.config.limits()
    }

    pub fn estimate_gas(&self, count: u64, op: OperationType) -> u64 {
        self.gas.estimate(count, op)
    }

    /// First `max_results` matching indices using the configured case policy
    pub fn search(&self, term: &str, max_results: usize) -> StoreResult<Vec<usize>> {
        counter!("store.operations.read").increment(1);
        Ok(self.snapshot()?.search(term, max_results))
    }

    pub fn search_with_mode(
        &self,
        term: &str,
        max_results: usize,
        mode: SearchMode,
    ) -> StoreResult<Vec<usize>> {
        counter!("store.operations.read").increment(1);
        Ok(self.snapshot()?.search_with_mode(term, max_results, mode))
    }

    pub fn get_stats(&self) -> StoreResult<MessageStats> {
        Ok(self.snapshot()?.get_stats())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Property: a valid bulk store grows the count by the batch size and
        // the appended range reads back the batch
        #[test]
        fn prop_bulk_store_reads_back(
            existing in prop::collection::vec("[a-z ]{0,12}", 0..20),
            batch in prop::collection::vec("[A-Za-z ]{0,12}", 1..=50),
        ) {
            let store = MessageStore::default();
            if !existing.is_empty() {
                store.bulk_store(existing.clone()).unwrap();
            }

            let old_count = store.get_count().unwrap();
            store.bulk_store(batch.clone()).unwrap();
            let new_count = store.get_count().unwrap();

            prop_assert_eq!(new_count, old_count + batch.len());
            let indices: Vec<usize> = (old_count..new_count).collect();
            prop_assert_eq!(store.bulk_get(&indices).unwrap(), batch);
        }

        // Property: remove never changes the length
        #[test]
        fn prop_remove_keeps_length(
            batch in prop::collection::vec("[a-z]{1,8}", 1..=50),
            picks in prop::collection::vec(0usize..50, 1..10),
        ) {
            let store = MessageStore::default();
            store.bulk_store(batch.clone()).unwrap();
            let indices: Vec<usize> = picks.into_iter().map(|i| i % batch.len()).collect();

            store.bulk_remove(&indices).unwrap();

            prop_assert_eq!(store.get_count().unwrap(), batch.len());
            for &index in &indices {
                prop_assert!(store.snapshot().unwrap().messages().is_tombstone(index));
            }
        }
    }
}
