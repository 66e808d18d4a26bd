//! Test utilities and helpers for BulkStore
//!
//! Reference message sets, prebuilt stores and assertion helpers shared by
//! unit and integration tests.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
