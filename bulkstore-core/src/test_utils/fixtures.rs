//! Test fixtures for creating common test objects
//!
//! The message sets are the reference scenarios for bulk operations.

use crate::ledger::LocalLedger;
use crate::store::{GasSchedule, MessageStore, MessageStoreConfig, SearchMode};
use std::sync::Arc;

pub const GREEK_MESSAGES: [&str; 5] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];

pub const ORDINAL_MESSAGES: [&str; 5] = ["First", "Second", "Third", "Fourth", "Fifth"];

pub const KEEP_REMOVE_MESSAGES: [&str; 5] = ["Keep", "Remove1", "Keep", "Remove2", "Keep"];

pub const SEARCH_MESSAGES: [&str; 5] = [
    "Hello world message",
    "Another test message",
    "World peace message",
    "Simple greeting",
    "World domination plans",
];

pub const STATS_MESSAGES: [&str; 5] = [
    "Short",
    "",
    "This is a longer message with more content",
    "Medium length message",
    "",
];

/// Owned copies of a fixture list
pub fn messages(fixture: &[&str]) -> Vec<String> {
    fixture.iter().map(|m| m.to_string()).collect()
}

/// `count` distinct numbered messages
pub fn numbered_messages(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{} {}", prefix, i)).collect()
}

/// Builder for test stores
pub struct TestStoreBuilder {
    config: MessageStoreConfig,
    gas: GasSchedule,
    preload: Vec<String>,
}

impl TestStoreBuilder {
    pub fn new() -> Self {
        Self {
            config: MessageStoreConfig::default(),
            gas: GasSchedule::default(),
            preload: Vec::new(),
        }
    }

    pub fn with_messages(mut self, fixture: &[&str]) -> Self {
        self.preload.extend(messages(fixture));
        self
    }

    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.config.search_mode = mode;
        self
    }

    pub fn with_limits(mut self, max_store: usize, max_retrieve: usize) -> Self {
        self.config.max_store = max_store;
        self.config.max_retrieve = max_retrieve;
        self
    }

    pub fn build(self) -> MessageStore {
        let store = MessageStore::new(self.config, self.gas);
        for chunk in self.preload.chunks(store.get_limits().max_store) {
            store
                .bulk_store(chunk.to_vec())
                .expect("fixture batch within limits");
        }
        store
    }

    pub fn build_ledger(self) -> LocalLedger {
        LocalLedger::new(Arc::new(self.build()))
    }
}

impl Default for TestStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
