// Path: crates/consensus/src/bft/params.rs
//! BFT parameters are stored under the big-endian height from which they apply.
//! The parameters in force at a height are those of the greatest key not above it.

use lru::LruCache;
use meridian_api::state::{ModuleStore, StateAccess};
use meridian_crypto::sha256;
use meridian_types::app::BftParameters;
use meridian_types::error::{BftError, StateError};
use meridian_types::keys::{MODULE_NAME_BFT, MODULE_PREFIX_LENGTH, STORE_PREFIX_BFT_PARAMETERS};
use meridian_types::prelude::OptionExt;
use std::num::NonZeroUsize;

/// The store prefix of the BFT module: the first four bytes of `sha256("bft")`.
pub fn bft_module_prefix() -> [u8; MODULE_PREFIX_LENGTH] {
    let [a, b, c, d, ..] = sha256(MODULE_NAME_BFT.as_bytes());
    [a, b, c, d]
}

/// Typed access to the BFT parameters substore.
#[derive(Debug, Clone)]
pub struct BftParametersStore {
    store: ModuleStore<BftParameters>,
}

impl Default for BftParametersStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BftParametersStore {
    /// Creates the store under the BFT module prefix.
    pub fn new() -> Self {
        Self {
            store: ModuleStore::new(bft_module_prefix(), STORE_PREFIX_BFT_PARAMETERS),
        }
    }

    /// Stores `params` as applying from `height` on.
    pub fn set<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        height: u32,
        params: &BftParameters,
    ) -> Result<(), StateError> {
        self.store.set(state, &height.to_be_bytes(), params)
    }

    /// The parameters in force at `height`.
    pub fn get<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        height: u32,
    ) -> Result<BftParameters, StateError> {
        let entries = match height.checked_add(1) {
            Some(end) => self
                .store
                .range(state, &0u32.to_be_bytes(), &end.to_be_bytes())?,
            None => self.store.all(state)?,
        };
        entries
            .into_iter()
            .last()
            .map(|(_, params)| params)
            .or_not_found(|| format!("BFT parameters for height {height}"))
    }

    /// Whether parameters were stored for exactly `height`.
    pub fn exists<S: StateAccess + ?Sized>(&self, state: &S, height: u32) -> Result<bool, StateError> {
        self.store.has(state, &height.to_be_bytes())
    }

    /// Deletes every entry applying from a height below `height`, except the
    /// last one, which stays in force at `height`.
    pub fn delete_before<S: StateAccess + ?Sized>(
        &self,
        state: &mut S,
        height: u32,
    ) -> Result<usize, StateError> {
        let entries = self
            .store
            .range(state, &0u32.to_be_bytes(), &height.to_be_bytes())?;
        let stale = entries.len().saturating_sub(1);
        for (key, _) in entries.iter().take(stale) {
            self.store.del(state, key)?;
        }
        Ok(stale)
    }
}

/// Memoizes [`BftParametersStore::get`] per height.
///
/// Entries go stale when new parameters are stored; callers invalidate from the
/// height the new parameters apply.
#[derive(Debug)]
pub struct BftParametersCache {
    store: BftParametersStore,
    cache: LruCache<u32, BftParameters>,
}

impl BftParametersCache {
    /// Creates a cache remembering up to `capacity` heights.
    pub fn new(store: BftParametersStore, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            cache: LruCache::new(capacity),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &BftParametersStore {
        &self.store
    }

    /// The parameters in force at `height`.
    pub fn get_parameters<S: StateAccess + ?Sized>(
        &mut self,
        state: &S,
        height: u32,
    ) -> Result<BftParameters, BftError> {
        if let Some(params) = self.cache.get(&height) {
            return Ok(params.clone());
        }
        let params = self.store.get(state, height)?;
        self.cache.put(height, params.clone());
        Ok(params)
    }

    /// Drops every memoized height at or above `height`.
    pub fn invalidate_from(&mut self, height: u32) {
        let stale: Vec<u32> = self
            .cache
            .iter()
            .map(|(h, _)| *h)
            .filter(|h| *h >= height)
            .collect();
        for h in stale {
            self.cache.pop(&h);
        }
    }

    /// Number of memoized heights.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
