//! JSON call surface driven end to end

use bulkstore_core::ledger::{Call, DispatchOutcome, LedgerError, LocalLedger};
use bulkstore_core::store::MessageStore;
use serde_json::{json, Value};
use std::sync::Arc;

fn dispatch(ledger: &LocalLedger, call: Value) -> Value {
    let call: Call = serde_json::from_value(call).unwrap();
    serde_json::to_value(ledger.dispatch(call).unwrap()).unwrap()
}

#[test]
fn abi_names_drive_the_store() {
    let ledger = LocalLedger::new(Arc::new(MessageStore::default()));

    let receipt = dispatch(
        &ledger,
        json!({ "method": "bulkStoreMessages", "params": ["Welcome", "To", "Bulk"] }),
    );
    assert_eq!(receipt["status"], "success");
    assert_eq!(receipt["method"], "bulkStore");
    assert_eq!(receipt["gas_used"], 21_000 + 3 * 25_000);

    let receipt = dispatch(
        &ledger,
        json!({ "method": "bulkStoreAtIndices", "params": [[6], ["Index6"]] }),
    );
    assert_eq!(receipt["sequence"], 1);

    assert_eq!(dispatch(&ledger, json!({ "method": "getMessageCount" })), json!(7));
    assert_eq!(
        dispatch(&ledger, json!({ "method": "bulkGetMessages", "params": [0, 6] })),
        json!(["Welcome", "Index6"])
    );
    assert_eq!(
        dispatch(&ledger, json!({ "method": "getMessageRange", "params": [2, 4] })),
        json!(["Bulk", "", ""])
    );
    assert_eq!(
        dispatch(&ledger, json!({ "method": "searchMessages", "params": ["bulk", 5] })),
        json!([2])
    );
    assert_eq!(
        dispatch(&ledger, json!({ "method": "getMessageStats" })),
        json!([7, 4, 4])
    );
    assert_eq!(dispatch(&ledger, json!({ "method": "getBulkLimits" })), json!([50, 100]));
    assert_eq!(
        dispatch(&ledger, json!({ "method": "estimateBulkGas", "params": [10, 0] })),
        json!(271_000)
    );
}

#[test]
fn reverted_receipt_carries_reason() {
    let ledger = LocalLedger::new(Arc::new(MessageStore::default()));

    let receipt = dispatch(
        &ledger,
        json!({ "method": "bulkRemove", "params": [3] }),
    );
    assert_eq!(receipt["status"], "reverted");
    assert!(receipt["revert_reason"]
        .as_str()
        .unwrap()
        .contains("out of range"));
}

#[test]
fn unknown_method_fails_to_decode() {
    let err: LedgerError = Call::from_json(r#"{"method":"dropTable"}"#)
        .unwrap_err()
        .into();
    assert!(matches!(err, LedgerError::Decode(_)));
}

#[test]
fn greeting_is_independent_of_array() {
    let ledger = LocalLedger::new(Arc::new(MessageStore::default()));

    dispatch(&ledger, json!({ "method": "storeMessage", "params": "gm" }));
    assert_eq!(dispatch(&ledger, json!({ "method": "message" })), json!("gm"));
    assert_eq!(dispatch(&ledger, json!({ "method": "getCount" })), json!(0));

    match ledger.dispatch(Call::GetMessage).unwrap() {
        DispatchOutcome::Output(output) => assert_eq!(output.to_json().unwrap(), r#""gm""#),
        other => panic!("expected output, got {:?}", other),
    }
}
