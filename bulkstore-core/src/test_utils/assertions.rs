//! Custom assertions for store tests

use crate::store::{ErrorKind, StoreResult};
use std::fmt::Debug;

/// Assert that a Result is Ok and return the value
pub fn assert_ok<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("Expected Ok, got Err: {:?}", e),
    }
}

/// Assert that a store call failed with the given kind
pub fn assert_store_err<T: Debug>(result: StoreResult<T>, kind: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {:?} error, got Ok: {:?}", kind, value),
        Err(e) => assert_eq!(e.kind(), kind, "unexpected error: {}", e),
    }
}

/// Assert that `slots` holds the tombstone (empty string) at every listed index
pub fn assert_tombstones(slots: &[String], indices: &[usize]) {
    for &index in indices {
        match slots.get(index) {
            Some(slot) if slot.is_empty() => {}
            Some(slot) => panic!("Expected tombstone at {}, found {:?}", index, slot),
            None => panic!("Index {} past end of {} slots", index, slots.len()),
        }
    }
}
