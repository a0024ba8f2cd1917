//! Deduplication across cells.
//!
//! A feature that spans several cells sits in several buckets, and a query
//! window usually covers more than one of them. The query engine funnels
//! every bucket it visits through a [`FeatureUnion`] so each id is reported
//! exactly once.

use crate::FeatureId;
use rustc_hash::FxHashSet;

/// Accumulates ids from many buckets, keeping the first occurrence of each.
#[derive(Debug, Default)]
pub(crate) struct FeatureUnion {
    seen: FxHashSet<FeatureId>,
    ids: Vec<FeatureId>,
    scanned: usize,
}

impl FeatureUnion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every id of one bucket.
    pub fn extend(&mut self, bucket: &[FeatureId]) {
        self.scanned += bucket.len();
        for &id in bucket {
            if self.seen.insert(id) {
                self.ids.push(id);
            }
        }
    }

    /// Ids looked at so far, duplicates included.
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// Finalize and return the unique ids.
    pub fn finish(self) -> Vec<FeatureId> {
        self.ids
    }
}
