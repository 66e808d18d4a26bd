//! Fill statistics over the message array

use serde::{Deserialize, Serialize};

/// Snapshot statistics returned by `get_stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStats {
    /// Array length, tombstones included
    pub total: usize,
    /// Slots holding a non-empty message
    pub filled: usize,
    /// Floor of the mean length (in chars) of filled slots; 0 when none are filled
    pub average_length: usize,
}

impl MessageStats {
    pub fn compute<'a, I>(slots: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut total = 0;
        let mut filled = 0;
        let mut length_sum = 0usize;

        for slot in slots {
            total += 1;
            if !slot.is_empty() {
                filled += 1;
                length_sum = length_sum.saturating_add(slot.chars().count());
            }
        }

        let average_length = if filled == 0 { 0 } else { length_sum / filled };

        MessageStats {
            total,
            filled,
            average_length,
        }
    }

    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.total, self.filled, self.average_length)
    }
}
