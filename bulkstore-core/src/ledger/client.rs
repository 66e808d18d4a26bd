/*
    client.rs - Ledger client over a message store

    The ledger is the only writer. It:
    - serializes submitted mutations and numbers them in commit order
    - turns store rejections into reverted receipts instead of errors
    - answers queries against the current state without committing,
      including dry runs of mutating calls
*/

use super::call::{Call, CallOutput};
use crate::store::{MessageStore, StoreError};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by the ledger itself, as opposed to reverted calls
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The store rejected a query
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// `submit` was given a call that does not mutate state
    #[error("Read-only call cannot be submitted: {0}")]
    ReadOnlyCall(&'static str),

    /// Call payload could not be decoded
    #[error("Failed to decode call: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Decode(err.to_string())
    }
}

/// Outcome of a submitted call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Record of one submitted call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in commit order, starting at 0
    pub sequence: u64,
    pub method: String,
    pub status: ReceiptStatus,
    /// Estimated gas charged for the call
    pub gas_used: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

/// Capability to execute calls against the store
pub trait LedgerClient {
    /// Commit a mutating call
    fn submit(&self, call: Call) -> Result<Receipt, LedgerError>;

    /// Evaluate a call without committing anything
    fn query(&self, call: Call) -> Result<CallOutput, LedgerError>;
}

/// In-process ledger owning the single write path to a store
pub struct LocalLedger {
    store: Arc<MessageStore>,
    next_sequence: Mutex<u64>,
}

impl LocalLedger {
    pub fn new(store: Arc<MessageStore>) -> Self {
        LocalLedger {
            store,
            next_sequence: Mutex::new(0),
        }
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    /// Number of calls submitted so far
    pub fn submitted(&self) -> Result<u64, LedgerError> {
        Ok(*self.next_sequence.lock().map_err(StoreError::from)?)
    }

    /// Submit when mutating, query otherwise
    pub fn dispatch(&self, call: Call) -> Result<DispatchOutcome, LedgerError> {
        if call.is_mutating() {
            self.submit(call).map(DispatchOutcome::Receipt)
        } else {
            self.query(call).map(DispatchOutcome::Output)
        }
    }

    fn gas_for(&self, call: &Call) -> u64 {
        let gas = self.store.gas_schedule();
        match call.gas_units() {
            Some((count, op)) => gas.estimate(count, op),
            None => gas.base,
        }
    }
}

impl LedgerClient for LocalLedger {
    fn submit(&self, call: Call) -> Result<Receipt, LedgerError> {
        if !call.is_mutating() {
            return Err(LedgerError::ReadOnlyCall(call.method()));
        }

        // Held across execution so sequence numbers follow commit order
        let mut next_sequence = self.next_sequence.lock().map_err(StoreError::from)?;
        let sequence = *next_sequence;
        *next_sequence += 1;

        let method = call.method();
        let gas_used = self.gas_for(&call);
        counter!("ledger.calls.submitted").increment(1);

        let receipt = match call.execute(&self.store) {
            Ok(_) => {
                info!(sequence, method, gas_used, "Call committed");
                Receipt {
                    sequence,
                    method: method.to_string(),
                    status: ReceiptStatus::Success,
                    gas_used,
                    revert_reason: None,
                }
            }
            Err(StoreError::LockPoisoned) => return Err(StoreError::LockPoisoned.into()),
            Err(err) => {
                warn!(sequence, method, error = %err, "Call reverted");
                counter!("ledger.calls.reverted").increment(1);
                Receipt {
                    sequence,
                    method: method.to_string(),
                    status: ReceiptStatus::Reverted,
                    gas_used,
                    revert_reason: Some(err.to_string()),
                }
            }
        };

        Ok(receipt)
    }

    fn query(&self, call: Call) -> Result<CallOutput, LedgerError> {
        if call.is_mutating() {
            debug!(method = call.method(), "Dry run");
            let scratch = self.store.fork()?;
            return Ok(call.execute(&scratch)?);
        }

        Ok(call.execute(&self.store)?)
    }
}

/// Result of [`LocalLedger::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DispatchOutcome {
    Receipt(Receipt),
    Output(CallOutput),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> LocalLedger {
        LocalLedger::new(Arc::new(MessageStore::default()))
    }

    fn strings(messages: &[&str]) -> Vec<String> {
        messages.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_submit_commits_and_numbers_calls() {
        let ledger = ledger();

        let first = ledger.submit(Call::BulkStore(strings(&["a", "b"]))).unwrap();
        let second = ledger.submit(Call::BulkRemove(vec![0])).unwrap();

        assert!(first.is_success());
        assert_eq!(first.sequence, 0);
        assert_eq!(first.gas_used, 21_000 + 2 * 25_000);
        assert_eq!(second.sequence, 1);
        assert_eq!(second.gas_used, 21_000 + 20_000);
        assert_eq!(ledger.submitted().unwrap(), 2);
        assert_eq!(
            ledger.query(Call::BulkGet(vec![0, 1])).unwrap(),
            CallOutput::Messages(strings(&["", "b"]))
        );
    }

    #[test]
    fn test_rejected_call_reverts() {
        let ledger = ledger();
        let receipt = ledger.submit(Call::BulkStore(Vec::new())).unwrap();

        assert_eq!(receipt.status, ReceiptStatus::Reverted);
        assert!(receipt.revert_reason.unwrap().contains("Invalid store count"));
        assert_eq!(ledger.query(Call::GetCount).unwrap(), CallOutput::Number(0));
        assert_eq!(ledger.submitted().unwrap(), 1);
    }

    #[test]
    fn test_oversized_store_at_reverts_and_store_stays_usable() {
        let ledger = ledger();
        ledger.submit(Call::BulkStore(strings(&["a"]))).unwrap();

        let receipt = ledger
            .submit(Call::BulkStoreAt(vec![0, u64::MAX - 1], strings(&["x", "y"])))
            .unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Reverted);
        assert!(receipt.revert_reason.unwrap().contains("Index out of range"));

        assert_eq!(ledger.query(Call::GetCount).unwrap(), CallOutput::Number(1));
        assert_eq!(
            ledger.query(Call::BulkGet(vec![0])).unwrap(),
            CallOutput::Messages(strings(&["a"]))
        );
        assert!(ledger.submit(Call::BulkStore(strings(&["b"]))).unwrap().is_success());
        assert_eq!(ledger.submitted().unwrap(), 3);
    }

    #[test]
    fn test_range_gas_saturates() {
        let receipt_gas = ledger().gas_for(&Call::GetRange(0, u64::MAX));
        assert_eq!(receipt_gas, u64::MAX);
    }

    #[test]
    fn test_submit_refuses_read_only_calls() {
        let err = ledger().submit(Call::GetCount).unwrap_err();
        assert!(matches!(err, LedgerError::ReadOnlyCall("getCount")));
    }

    #[test]
    fn test_query_of_mutation_is_a_dry_run() {
        let ledger = ledger();

        let output = ledger.query(Call::BulkStore(strings(&["x"]))).unwrap();
        assert_eq!(output, CallOutput::Unit);
        assert_eq!(ledger.query(Call::GetCount).unwrap(), CallOutput::Number(0));

        let too_many: Vec<String> = (0..51).map(|i| format!("Message {}", i)).collect();
        let err = ledger.query(Call::BulkStore(too_many)).unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::InvalidCount { .. })));
    }

    #[test]
    fn test_dispatch_routes_by_mutability() {
        let ledger = ledger();

        match ledger.dispatch(Call::StoreMessage("gm".to_string())).unwrap() {
            DispatchOutcome::Receipt(receipt) => assert!(receipt.is_success()),
            other => panic!("expected receipt, got {:?}", other),
        }
        assert_eq!(
            ledger.dispatch(Call::GetMessage).unwrap(),
            DispatchOutcome::Output(CallOutput::Text("gm".to_string()))
        );
    }

    #[test]
    fn test_receipt_json_omits_empty_reason() {
        let receipt = Receipt {
            sequence: 3,
            method: "bulkStore".to_string(),
            status: ReceiptStatus::Success,
            gas_used: 46_000,
            revert_reason: None,
        };
        let json = serde_json::to_string(&receipt).unwrap();
        assert_eq!(
            json,
            r#"{"sequence":3,"method":"bulkStore","status":"success","gas_used":46000}"#
        );
    }
}
