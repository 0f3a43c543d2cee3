// Path: crates/types/src/prelude.rs

//! Commonly used codec traits and the `Option` extension used by the stores.

pub use crate::codec::{Object, SchemaObject, Value};
use crate::error::StateError;

/// Turns an absent store entry into [`StateError::NotFound`].
pub trait OptionExt<T> {
    /// Returns the value, or `NotFound` carrying the description built by `what`.
    fn or_not_found<F: FnOnce() -> String>(self, what: F) -> Result<T, StateError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found<F: FnOnce() -> String>(self, what: F) -> Result<T, StateError> {
        self.ok_or_else(|| StateError::NotFound(what()))
    }
}
