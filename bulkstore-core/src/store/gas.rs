//! Gas cost model for bulk operations
//!
//! `estimate = base + per_unit(operation) * count`. Pure arithmetic, no
//! state access.

use super::errors::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Operation category priced by the gas schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Store = 0,
    Retrieve = 1,
    Remove = 2,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Store => "store",
            OperationType::Retrieve => "retrieve",
            OperationType::Remove => "remove",
        }
    }
}

impl TryFrom<u64> for OperationType {
    type Error = StoreError;

    fn try_from(code: u64) -> StoreResult<Self> {
        match code {
            0 => Ok(OperationType::Store),
            1 => Ok(OperationType::Retrieve),
            2 => Ok(OperationType::Remove),
            other => Err(StoreError::InvalidOperationType(other)),
        }
    }
}

impl From<OperationType> for u64 {
    fn from(op: OperationType) -> Self {
        op as u64
    }
}

/// Per-operation gas prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSchedule {
    /// Flat cost charged once per call
    pub base: u64,
    /// Cost per stored message
    pub store: u64,
    /// Cost per retrieved message
    pub retrieve: u64,
    /// Cost per removed message
    pub remove: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        GasSchedule {
            base: 21_000,
            store: 25_000,
            retrieve: 5_000,
            remove: 20_000,
        }
    }
}

impl GasSchedule {
    pub fn per_unit(&self, op: OperationType) -> u64 {
        match op {
            OperationType::Store => self.store,
            OperationType::Retrieve => self.retrieve,
            OperationType::Remove => self.remove,
        }
    }

    /// Estimate the gas for `count` units of `op`. Saturates at `u64::MAX`.
    pub fn estimate(&self, count: u64, op: OperationType) -> u64 {
        self.per_unit(op)
            .saturating_mul(count)
            .saturating_add(self.base)
    }

    /// Same as [`estimate`](Self::estimate) with a raw operation code
    pub fn estimate_raw(&self, count: u64, op_code: u64) -> StoreResult<u64> {
        let op = OperationType::try_from(op_code)?;
        Ok(self.estimate(count, op))
    }
}
