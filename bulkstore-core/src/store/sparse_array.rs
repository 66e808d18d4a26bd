/*
    sparse_array.rs - Growable array with default-filled gaps

    Slots are contiguous from 0 to len-1. Writing past the end extends the
    array and fills the gap with T::default(). Removing a slot resets it to
    T::default() (the tombstone) without shrinking. The length never
    decreases.

    The tombstone count is kept up to date on every write, so reading it
    is O(1). On the wire the array is a plain list.
*/

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Append/sparse array whose length only grows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseArray<T> {
    slots: Vec<T>,
    tombstones: usize,
}

impl<T: Default + PartialEq> SparseArray<T> {
    pub fn new() -> Self {
        SparseArray {
            slots: Vec::new(),
            tombstones: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append a value at the current end
    pub fn push(&mut self, value: T) {
        if value == T::default() {
            self.tombstones += 1;
        }
        self.slots.push(value);
    }

    /// Grow to at least `len` slots, filling new slots with the default.
    /// Never shrinks.
    pub fn extend_to(&mut self, len: usize) {
        if len > self.slots.len() {
            self.tombstones += len - self.slots.len();
            self.slots.resize_with(len, T::default);
        }
    }

    /// Write `value` at `index`, extending the array when needed.
    /// Callers bound `index`; the gap is allocated eagerly.
    pub fn set(&mut self, index: usize, value: T) {
        self.extend_to(index.saturating_add(1));
        let empty = T::default();
        let was_empty = self.slots[index] == empty;
        let is_empty = value == empty;
        self.slots[index] = value;

        match (was_empty, is_empty) {
            (true, false) => self.tombstones -= 1,
            (false, true) => self.tombstones += 1,
            _ => {}
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    /// Reset a slot to the default value. Returns false when out of range.
    pub fn tombstone(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                let empty = T::default();
                if *slot != empty {
                    *slot = empty;
                    self.tombstones += 1;
                }
                true
            }
            None => false,
        }
    }

    pub fn is_tombstone(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .map(|slot| *slot == T::default())
            .unwrap_or(false)
    }

    /// Number of slots currently holding the default value
    pub fn tombstone_count(&self) -> usize {
        self.tombstones
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.slots
    }
}

impl<T: Default + PartialEq> From<Vec<T>> for SparseArray<T> {
    fn from(slots: Vec<T>) -> Self {
        let empty = T::default();
        let tombstones = slots.iter().filter(|slot| **slot == empty).count();
        SparseArray { slots, tombstones }
    }
}

impl<T: Default + PartialEq> FromIterator<T> for SparseArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SparseArray::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T: Serialize> Serialize for SparseArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.slots.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for SparseArray<T>
where
    T: Deserialize<'de> + Default + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(SparseArray::from)
    }
}
