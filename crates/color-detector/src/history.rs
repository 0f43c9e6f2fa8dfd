//! Bounded history of recent samples.

use std::collections::VecDeque;

use tracing::trace;

use crate::color::Sample;

/// Default number of samples kept.
pub const DEFAULT_CAPACITY: usize = 6;

/// The most recent samples, newest first.
///
/// A push whose hex equals the current head is dropped, so holding the camera
/// still doesn't flood the list. Duplicates further back are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<Sample>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` samples.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend a sample, dropping the oldest beyond capacity.
    ///
    /// Returns `false` if the sample repeats the head and was skipped.
    pub fn push(&mut self, sample: Sample) -> bool {
        if self.head().is_some_and(|head| head.hex() == sample.hex()) {
            trace!(hex = sample.hex(), "Skipping repeat of history head");
            return false;
        }

        self.entries.push_front(sample);
        self.entries.truncate(self.capacity);
        true
    }

    /// The newest sample.
    #[must_use]
    pub fn head(&self) -> Option<&Sample> {
        self.entries.front()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.entries.iter()
    }

    /// Number of samples held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no samples are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of samples held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
