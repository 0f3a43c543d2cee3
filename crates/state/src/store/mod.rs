// Path: crates/state/src/store/mod.rs
//! An in-memory, journaled key-value store.

use meridian_api::state::{SnapshotState, StateAccess, StateScanIter};
use meridian_types::error::StateError;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;

/// An ordered in-memory store that records the previous value of every write.
///
/// A snapshot is the current journal length; restoring pops the journal back
/// to that length, reinstating each overwritten or deleted value.
///
/// The journal grows with every write until [`InMemoryState::commit`]. The
/// block processor must commit once a block has executed, after which no
/// snapshot taken during that block can be restored.
#[derive(Debug, Clone, Default)]
pub struct InMemoryState {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    journal: Vec<(Vec<u8>, Option<Vec<u8>>)>,
}

impl InMemoryState {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the journal, making the current contents permanent and
    /// invalidating every outstanding snapshot.
    pub fn commit(&mut self) {
        self.journal.clear();
    }

    /// Number of writes that a restore could still undo.
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn scan<'a>(
        &'a self,
        range: (std::ops::Bound<&'a [u8]>, std::ops::Bound<&'a [u8]>),
    ) -> StateScanIter<'a> {
        Box::new(
            self.data
                .range::<[u8], _>(range)
                .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice())))),
        )
    }
}

impl StateAccess for InMemoryState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        let previous = self.data.insert(key.to_vec(), value.to_vec());
        self.journal.push((key.to_vec(), previous));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        if let Some(previous) = self.data.remove(key) {
            self.journal.push((key.to_vec(), Some(previous)));
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let upper = meridian_api::state::next_prefix(prefix);
        let end = match &upper {
            Some(ub) => Excluded(ub.as_slice()),
            None => Unbounded,
        };
        // The upper bound is owned by this frame, so collect before returning.
        let entries: Vec<_> = self.scan((Included(prefix), end)).collect();
        Ok(Box::new(entries.into_iter()))
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        if start >= end {
            return Ok(Box::new(std::iter::empty()));
        }
        let entries: Vec<_> = self.scan((Included(start), Excluded(end))).collect();
        Ok(Box::new(entries.into_iter()))
    }
}

impl SnapshotState for InMemoryState {
    fn snapshot(&mut self) -> usize {
        self.journal.len()
    }

    fn restore_snapshot(&mut self, snapshot_id: usize) -> Result<(), StateError> {
        if snapshot_id > self.journal.len() {
            return Err(StateError::InvalidSnapshot(snapshot_id));
        }
        while self.journal.len() > snapshot_id {
            let Some((key, previous)) = self.journal.pop() else {
                break;
            };
            match previous {
                Some(value) => {
                    self.data.insert(key, value);
                }
                None => {
                    self.data.remove(&key);
                }
            }
        }
        tracing::trace!(target: "state", snapshot_id, "restored snapshot");
        Ok(())
    }
}
