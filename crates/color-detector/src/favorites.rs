//! Persisted favorite colors.
//!
//! Favorites are unique by hex and kept in insertion order. The whole list is
//! written back to the store as one JSON array after every change and read
//! once when the store is opened.

use std::fmt;

use tracing::{debug, warn};

use crate::color::Sample;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

/// Storage key holding the favorites array.
pub const FAVORITES_KEY: &str = "colorDetectorFavorites";

/// The favorites set, bound to the store it persists into.
pub struct Favorites {
    store: Box<dyn KeyValueStore>,
    items: Vec<Sample>,
}

impl fmt::Debug for Favorites {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Favorites")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl Favorites {
    /// Load favorites from `store`.
    ///
    /// A missing key yields an empty set. A payload that isn't a JSON array
    /// of samples is logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read.
    pub fn load(store: Box<dyn KeyValueStore>) -> Result<Self> {
        let items = match store.get(FAVORITES_KEY)? {
            Some(payload) => match parse_payload(&payload) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "Failed to parse saved favorites, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        debug!(count = items.len(), "Loaded favorites");
        Ok(Self { store, items })
    }

    /// Add a sample unless its hex is already present.
    ///
    /// Returns whether the sample was added.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted.
    pub fn add(&mut self, sample: Sample) -> Result<bool> {
        if self.contains(sample.hex()) {
            return Ok(false);
        }

        debug!(hex = sample.hex(), "Adding favorite");
        let mut next = self.items.clone();
        next.push(sample);
        self.commit(next)?;
        Ok(true)
    }

    /// Remove every favorite with the given hex.
    ///
    /// Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted.
    pub fn remove(&mut self, hex: &str) -> Result<bool> {
        let next: Vec<Sample> = self
            .items
            .iter()
            .filter(|fav| fav.hex() != hex)
            .cloned()
            .collect();
        let removed = next.len() != self.items.len();

        debug!(hex, removed, "Removing favorite");
        self.commit(next)?;
        Ok(removed)
    }

    /// Check whether a hex is a favorite.
    #[must_use]
    pub fn contains(&self, hex: &str) -> bool {
        self.items.iter().any(|fav| fav.hex() == hex)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.items.iter()
    }

    /// The favorites as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Sample] {
        &self.items
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Write `next` to the store; memory only changes once the write lands.
    fn commit(&mut self, next: Vec<Sample>) -> Result<()> {
        let payload = serde_json::to_string(&next)?;
        self.store.set(FAVORITES_KEY, &payload)?;
        self.items = next;
        Ok(())
    }
}

fn parse_payload(payload: &str) -> Result<Vec<Sample>> {
    serde_json::from_str(payload).map_err(|e| Error::StorageParse {
        key: FAVORITES_KEY.to_string(),
        message: e.to_string(),
    })
}
