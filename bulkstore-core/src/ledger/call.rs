/*
    call.rs - Call surface of the message store

    Each store operation is one Call variant. On the wire a call is

    ```json
    { "method": "bulkStoreAt", "params": [[0, 2], ["Zero", "Two"]] }
    ```

    Multi-argument calls carry a positional array in `params`;
    single-argument calls carry the argument itself; calls without
    arguments omit `params`. The contract ABI names (bulkStoreMessages,
    getMessageRange, ...) are accepted as aliases.
*/

use crate::store::{MessageStore, OperationType, StoreResult};
use serde::{Deserialize, Serialize};

/// One named operation with positional arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum Call {
    #[serde(alias = "bulkStoreMessages")]
    BulkStore(Vec<String>),

    #[serde(alias = "bulkGetMessages")]
    BulkGet(Vec<u64>),

    /// Inclusive `[start, end]`
    #[serde(alias = "getMessageRange")]
    GetRange(u64, u64),

    #[serde(alias = "bulkStoreAtIndices")]
    BulkStoreAt(Vec<u64>, Vec<String>),

    #[serde(alias = "bulkRemoveMessages")]
    BulkRemove(Vec<u64>),

    #[serde(alias = "getMessageCount")]
    GetCount,

    #[serde(alias = "getBulkLimits")]
    GetLimits,

    /// `(count, operation code)`
    #[serde(alias = "estimateBulkGas")]
    EstimateGas(u64, u64),

    /// `(term, max results)`
    #[serde(alias = "searchMessages")]
    Search(String, u64),

    #[serde(alias = "getMessageStats")]
    GetStats,

    StoreMessage(String),

    GetMessage,

    Message,
}

/// Return value of a call, serialized in the shape of the operation's
/// return tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CallOutput {
    Unit,
    Messages(Vec<String>),
    Indices(Vec<u64>),
    Number(u64),
    Limits(u64, u64),
    Stats(u64, u64, u64),
    Text(String),
}

fn to_index(raw: u64) -> usize {
    // Indices that do not fit usize are past any reachable length
    usize::try_from(raw).unwrap_or(usize::MAX)
}

fn to_indices(raw: &[u64]) -> Vec<usize> {
    raw.iter().copied().map(to_index).collect()
}

fn to_u64(value: usize) -> u64 {
    value as u64
}

impl Call {
    /// Canonical method name
    pub fn method(&self) -> &'static str {
        match self {
            Call::BulkStore(_) => "bulkStore",
            Call::BulkGet(_) => "bulkGet",
            Call::GetRange(..) => "getRange",
            Call::BulkStoreAt(..) => "bulkStoreAt",
            Call::BulkRemove(_) => "bulkRemove",
            Call::GetCount => "getCount",
            Call::GetLimits => "getLimits",
            Call::EstimateGas(..) => "estimateGas",
            Call::Search(..) => "search",
            Call::GetStats => "getStats",
            Call::StoreMessage(_) => "storeMessage",
            Call::GetMessage => "getMessage",
            Call::Message => "message",
        }
    }

    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::BulkStore(_) | Call::BulkStoreAt(..) | Call::BulkRemove(_) | Call::StoreMessage(_)
        )
    }

    /// Units priced by the gas schedule, for calls that touch slots
    pub fn gas_units(&self) -> Option<(u64, OperationType)> {
        match self {
            Call::BulkStore(messages) => Some((to_u64(messages.len()), OperationType::Store)),
            Call::BulkStoreAt(indices, _) => Some((to_u64(indices.len()), OperationType::Store)),
            Call::StoreMessage(_) => Some((1, OperationType::Store)),
            Call::BulkRemove(indices) => Some((to_u64(indices.len()), OperationType::Remove)),
            Call::BulkGet(indices) => Some((to_u64(indices.len()), OperationType::Retrieve)),
            Call::GetRange(start, end) if end >= start => {
                Some(((end - start).saturating_add(1), OperationType::Retrieve))
            }
            _ => None,
        }
    }

    /// Parse a call from its JSON form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Run the call against a store
    pub fn execute(self, store: &MessageStore) -> StoreResult<CallOutput> {
        let output = match self {
            Call::BulkStore(messages) => {
                store.bulk_store(messages)?;
                CallOutput::Unit
            }
            Call::BulkGet(indices) => CallOutput::Messages(store.bulk_get(&to_indices(&indices))?),
            Call::GetRange(start, end) => {
                CallOutput::Messages(store.get_range(to_index(start), to_index(end))?)
            }
            Call::BulkStoreAt(indices, messages) => {
                store.bulk_store_at(&to_indices(&indices), messages)?;
                CallOutput::Unit
            }
            Call::BulkRemove(indices) => {
                store.bulk_remove(&to_indices(&indices))?;
                CallOutput::Unit
            }
            Call::GetCount => CallOutput::Number(to_u64(store.get_count()?)),
            Call::GetLimits => {
                let limits = store.get_limits();
                CallOutput::Limits(to_u64(limits.max_store), to_u64(limits.max_retrieve))
            }
            Call::EstimateGas(count, op_code) => {
                let op = OperationType::try_from(op_code)?;
                CallOutput::Number(store.estimate_gas(count, op))
            }
            Call::Search(term, max_results) => {
                let found = store.search(&term, to_index(max_results))?;
                CallOutput::Indices(found.into_iter().map(to_u64).collect())
            }
            Call::GetStats => {
                let (total, filled, average) = store.get_stats()?.as_tuple();
                CallOutput::Stats(to_u64(total), to_u64(filled), to_u64(average))
            }
            Call::StoreMessage(message) => {
                store.store_message(message)?;
                CallOutput::Unit
            }
            Call::GetMessage | Call::Message => CallOutput::Text(store.get_message()?),
        };
        Ok(output)
    }
}

impl CallOutput {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use serde_json::json;

    #[test]
    fn test_parse_positional_params() {
        let call = Call::from_json(r#"{"method":"bulkStoreAt","params":[[0,2],["Zero","Two"]]}"#)
            .unwrap();
        assert_eq!(
            call,
            Call::BulkStoreAt(vec![0, 2], vec!["Zero".to_string(), "Two".to_string()])
        );

        let call = Call::from_json(r#"{"method":"getRange","params":[1,3]}"#).unwrap();
        assert_eq!(call, Call::GetRange(1, 3));

        let call = Call::from_json(r#"{"method":"getCount"}"#).unwrap();
        assert_eq!(call, Call::GetCount);
    }

    #[test]
    fn test_parse_contract_aliases() {
        let call = Call::from_json(r#"{"method":"bulkStoreMessages","params":["a","b"]}"#).unwrap();
        assert_eq!(call, Call::BulkStore(vec!["a".to_string(), "b".to_string()]));

        let call = Call::from_json(r#"{"method":"estimateBulkGas","params":[10,0]}"#).unwrap();
        assert_eq!(call, Call::EstimateGas(10, 0));

        let call = Call::from_json(r#"{"method":"getMessageStats"}"#).unwrap();
        assert_eq!(call, Call::GetStats);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        assert!(Call::from_json(r#"{"method":"dropTable"}"#).is_err());
    }

    #[test]
    fn test_serializes_canonical_names() {
        let value = serde_json::to_value(Call::Search("world".to_string(), 10)).unwrap();
        assert_eq!(value, json!({"method": "search", "params": ["world", 10]}));
        assert_eq!(Call::Search("w".to_string(), 1).method(), "search");
    }

    #[test]
    fn test_output_shapes() {
        assert_eq!(CallOutput::Unit.to_json().unwrap(), "null");
        assert_eq!(CallOutput::Limits(50, 100).to_json().unwrap(), "[50,100]");
        assert_eq!(CallOutput::Stats(5, 3, 22).to_json().unwrap(), "[5,3,22]");
        assert_eq!(CallOutput::Indices(vec![0, 2]).to_json().unwrap(), "[0,2]");
        assert_eq!(CallOutput::Number(271000).to_json().unwrap(), "271000");
    }

    #[test]
    fn test_mutating_classification() {
        assert!(Call::BulkRemove(vec![1]).is_mutating());
        assert!(Call::StoreMessage("hi".to_string()).is_mutating());
        assert!(!Call::BulkGet(vec![1]).is_mutating());
        assert!(!Call::EstimateGas(1, 0).is_mutating());
    }

    #[test]
    fn test_gas_units() {
        assert_eq!(
            Call::BulkStore(vec!["a".to_string(); 3]).gas_units(),
            Some((3, OperationType::Store))
        );
        assert_eq!(Call::GetRange(1, 3).gas_units(), Some((3, OperationType::Retrieve)));
        assert_eq!(Call::GetRange(3, 1).gas_units(), None);
        assert_eq!(
            Call::GetRange(0, u64::MAX).gas_units(),
            Some((u64::MAX, OperationType::Retrieve))
        );
        assert_eq!(Call::GetCount.gas_units(), None);
    }

    #[test]
    fn test_execute_dispatches() {
        let store = MessageStore::default();
        Call::BulkStore(vec!["a".to_string(), "b".to_string()])
            .execute(&store)
            .unwrap();

        assert_eq!(Call::GetCount.execute(&store).unwrap(), CallOutput::Number(2));
        assert_eq!(
            Call::BulkGet(vec![1]).execute(&store).unwrap(),
            CallOutput::Messages(vec!["b".to_string()])
        );
        assert_eq!(
            Call::EstimateGas(5, 2).execute(&store).unwrap(),
            CallOutput::Number(121_000)
        );
        assert_eq!(
            Call::EstimateGas(5, 9).execute(&store).unwrap_err(),
            StoreError::InvalidOperationType(9)
        );
        assert_eq!(
            Call::BulkGet(vec![u64::MAX]).execute(&store).unwrap_err().kind(),
            crate::store::ErrorKind::IndexOutOfRange
        );
    }
}
