//! Metrics for the store and ledger
//!
//! Recording goes through the `metrics` facade and is a no-op until the
//! host installs a recorder.

use metrics::{describe_counter, describe_gauge, describe_histogram, histogram};
use std::time::Instant;

/// Register descriptions for every metric BulkStore records
pub fn init_metrics() {
    // Store metrics
    describe_counter!("store.operations.read", "Store read operations");
    describe_counter!("store.operations.write", "Committed store mutations");
    describe_counter!("store.operations.rejected", "Mutations rejected by validation");
    describe_gauge!("store.length", "Current length of the message array");
    describe_gauge!("store.tombstones", "Number of empty slots in the message array");
    describe_histogram!(
        "store.operation.duration_ms",
        "Store mutation duration in milliseconds"
    );

    // Ledger metrics
    describe_counter!("ledger.calls.submitted", "Calls submitted to the ledger");
    describe_counter!("ledger.calls.reverted", "Submitted calls that reverted");
}

/// Records elapsed time into a histogram when stopped
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn stop(self) {
        let duration = self.start.elapsed();
        histogram!(self.name).record(duration.as_secs_f64() * 1000.0);
    }
}
