// Path: crates/api/src/state/accessor.rs
//! Defines the `StateAccess` and `SnapshotState` traits.

use crate::state::StateScanIter;
use meridian_types::error::StateError;

/// A dyn-safe trait that provides a complete interface for key-value storage operations,
/// including single-item, batch, and scanning methods.
///
/// Modules interact with state through this trait only; the backend behind it is
/// free to be an in-memory map, an overlay or a persistent tree.
pub trait StateAccess {
    /// Gets a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    /// Inserts a key-value pair.
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError>;

    /// Deletes a key-value pair. Deleting an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StateError>;

    /// Sets multiple key-value pairs in a single batch operation.
    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        for (key, value) in updates {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Gets multiple values by keys in a single batch operation.
    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Scans for all key-value pairs starting with the given prefix.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError>;

    /// Scans the key-value pairs with `start <= key < end`.
    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<StateScanIter<'_>, StateError>;
}

/// A state backend whose changes can be rolled back to an earlier marker.
///
/// Taking a snapshot is O(1); restoring undoes every write made after the marker
/// and invalidates all markers taken after it.
pub trait SnapshotState: StateAccess {
    /// Returns a marker for the current state.
    fn snapshot(&mut self) -> usize;

    /// Rolls back every change made since `snapshot_id` was taken.
    fn restore_snapshot(&mut self, snapshot_id: usize) -> Result<(), StateError>;
}

// Blanket implementation to allow `StateAccess` to be used behind a `Box` trait object.
impl<T: StateAccess + ?Sized> StateAccess for Box<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        (**self).get(key)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        (**self).insert(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        (**self).delete(key)
    }

    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        (**self).batch_set(updates)
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StateError> {
        (**self).batch_get(keys)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        (**self).prefix_scan(prefix)
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        (**self).range_scan(start, end)
    }
}

impl<T: SnapshotState + ?Sized> SnapshotState for Box<T> {
    fn snapshot(&mut self) -> usize {
        (**self).snapshot()
    }

    fn restore_snapshot(&mut self, snapshot_id: usize) -> Result<(), StateError> {
        (**self).restore_snapshot(snapshot_id)
    }
}
