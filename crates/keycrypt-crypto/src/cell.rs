//! Guarded in-memory holder for the raw encryption key.
//!
//! The key never leaves a [`KeyCell`] by value or by a reference that
//! outlives a call: [`KeyCell::with_value`] lends it to a closure and takes
//! it back. The backing buffer is zeroed on [`KeyCell::clear`], on
//! replacement, and on drop.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};

/// Holds at most one key. Either empty or populated.
#[derive(Default)]
pub struct KeyCell {
    value: Option<Zeroizing<Vec<u8>>>,
}

impl KeyCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `bytes` as the current key.
    ///
    /// Lengths are not checked here; a key of the wrong size surfaces as a
    /// cipher error on first use. A previously held key is zeroed.
    pub fn consume(&mut self, bytes: impl Into<Zeroizing<Vec<u8>>>) {
        self.value = Some(bytes.into());
    }

    /// Run `f` against the raw key bytes and return its result.
    ///
    /// Fails with [`CryptoError::KeyUnavailable`] when the cell is empty.
    pub fn with_value<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&[u8]) -> T,
    {
        let key = self.value.as_ref().ok_or(CryptoError::KeyUnavailable)?;
        Ok(f(key.as_slice()))
    }

    /// Zero the key and empty the cell. Safe to call repeatedly.
    pub fn clear(&mut self) {
        // Dropping the Zeroizing wrapper overwrites the buffer.
        self.value = None;
    }

    /// Whether a key is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Debug for KeyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_loaded() { "populated" } else { "empty" };
        f.debug_struct("KeyCell").field("state", &state).finish()
    }
}
