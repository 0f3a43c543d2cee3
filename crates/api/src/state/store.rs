// Path: crates/api/src/state/store.rs
//! A typed view of one module substore.

use crate::state::{StateAccess, StateKey, StateVal};
use meridian_types::codec::SchemaObject;
use meridian_types::error::StateError;
use meridian_types::keys::{MODULE_PREFIX_LENGTH, SUBSTORE_PREFIX_LENGTH};
use meridian_types::prelude::OptionExt;
use std::fmt;
use std::marker::PhantomData;

/// Stores values of type `T` under `module prefix || substore prefix || key`.
///
/// Values are encoded with `T`'s schema. Reads of absent keys fail with
/// [`StateError::NotFound`]; use [`ModuleStore::get_opt`] when absence is expected.
pub struct ModuleStore<T> {
    prefix: Vec<u8>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ModuleStore<T> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ModuleStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleStore")
            .field("prefix", &hex::encode(&self.prefix))
            .finish()
    }
}

impl<T: SchemaObject> ModuleStore<T> {
    /// Creates the store for `substore_prefix` within the module owning `module_prefix`.
    pub fn new(
        module_prefix: [u8; MODULE_PREFIX_LENGTH],
        substore_prefix: [u8; SUBSTORE_PREFIX_LENGTH],
    ) -> Self {
        Self {
            prefix: [module_prefix.as_slice(), substore_prefix.as_slice()].concat(),
            _marker: PhantomData,
        }
    }

    /// The full state key of `key`.
    pub fn key(&self, key: &[u8]) -> Vec<u8> {
        [self.prefix.as_slice(), key].concat()
    }

    /// The module and substore prefix shared by every entry.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Reads and decodes the value under `key`.
    pub fn get<S: StateAccess + ?Sized>(&self, state: &S, key: &[u8]) -> Result<T, StateError> {
        self.get_opt(state, key)?
            .or_not_found(|| hex::encode(self.key(key)))
    }

    /// Reads and decodes the value under `key`, if any.
    pub fn get_opt<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        key: &[u8],
    ) -> Result<Option<T>, StateError> {
        match state.get(&self.key(key))? {
            Some(bytes) => Ok(Some(T::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Whether a value is stored under `key`.
    pub fn has<S: StateAccess + ?Sized>(&self, state: &S, key: &[u8]) -> Result<bool, StateError> {
        Ok(state.get(&self.key(key))?.is_some())
    }

    /// Encodes and stores `value` under `key`.
    pub fn set<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        key: &[u8],
        value: &T,
    ) -> Result<(), StateError> {
        state.insert(&self.key(key), &value.encode()?)
    }

    /// Removes the value under `key`.
    pub fn del<S: StateAccess + ?Sized>(&self, state: &mut S, key: &[u8]) -> Result<(), StateError> {
        state.delete(&self.key(key))
    }

    /// Decodes the entries with `start <= key < end` (keys without the prefix),
    /// in ascending key order.
    pub fn range<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        start: &[u8],
        end: &[u8],
    ) -> Result<Vec<(Vec<u8>, T)>, StateError> {
        state
            .range_scan(&self.key(start), &self.key(end))?
            .map(|entry| self.decode_entry(entry?))
            .collect()
    }

    /// Decodes every entry of the substore, in ascending key order.
    pub fn all<S: StateAccess + ?Sized>(&self, state: &S) -> Result<Vec<(Vec<u8>, T)>, StateError> {
        state
            .prefix_scan(&self.prefix)?
            .map(|entry| self.decode_entry(entry?))
            .collect()
    }

    fn decode_entry(
        &self,
        (key, value): (StateKey, StateVal),
    ) -> Result<(Vec<u8>, T), StateError> {
        let suffix = key
            .get(self.prefix.len()..)
            .ok_or_else(|| StateError::Backend("scanned key shorter than store prefix".into()))?;
        Ok((suffix.to_vec(), T::decode(&value)?))
    }
}
