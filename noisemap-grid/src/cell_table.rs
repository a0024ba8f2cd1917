//! Cell table and bucket arena.
//!
//! Storage is split in two:
//!
//! ```text
//! slots:   [ EMPTY | 0 | EMPTY | EMPTY | 1 | ... ]   one per cell, row-major
//!                    │                   │
//! buckets: [ [7, 9, 12], [9], ... ]  ◄───┘           allocated on first use
//! ```
//!
//! Slots hold a bucket index or [`EMPTY_SLOT`]. Buckets are appended in the
//! order cells first receive a feature, and a slot never changes its bucket
//! once assigned. Nothing is ever removed.

use crate::FeatureId;

/// Sentinel slot value for a cell with no bucket.
pub const EMPTY_SLOT: u32 = u32::MAX;

/// Dense slot table plus append-only bucket arena.
#[derive(Debug, Clone)]
pub struct CellTable {
    /// Bucket index per cell, or `EMPTY_SLOT`.
    slots: Vec<u32>,

    /// Feature ids per occupied cell, in bucket allocation order.
    buckets: Vec<Vec<FeatureId>>,

    /// Total ids across all buckets.
    entry_count: usize,
}

impl CellTable {
    /// Create a table with `cell_count` empty slots.
    ///
    /// `cell_count` must be below `EMPTY_SLOT`; [`GridConfig::validate`]
    /// guarantees this for any lattice.
    ///
    /// [`GridConfig::validate`]: crate::GridConfig::validate
    pub fn new(cell_count: usize) -> Self {
        debug_assert!(cell_count < EMPTY_SLOT as usize);
        Self {
            slots: vec![EMPTY_SLOT; cell_count],
            buckets: Vec::new(),
            entry_count: 0,
        }
    }

    /// Append `id` to the bucket of `slot`, allocating the bucket if needed.
    pub fn record(&mut self, slot: usize, id: FeatureId) {
        let bucket = match self.slots[slot] {
            EMPTY_SLOT => {
                let bucket = self.buckets.len() as u32;
                self.buckets.push(Vec::new());
                self.slots[slot] = bucket;
                bucket
            }
            bucket => bucket,
        };
        self.buckets[bucket as usize].push(id);
        self.entry_count += 1;
    }

    /// Ids recorded for `slot`, or `None` if the cell has no bucket.
    pub fn bucket(&self, slot: usize) -> Option<&[FeatureId]> {
        match self.slots.get(slot).copied() {
            None | Some(EMPTY_SLOT) => None,
            Some(bucket) => Some(&self.buckets[bucket as usize]),
        }
    }

    /// Number of allocated buckets (occupied cells).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total ids stored across all buckets.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Iterate `(slot, ids)` for every occupied cell, in slot order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &[FeatureId])> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b != EMPTY_SLOT)
            .map(|(slot, &b)| (slot, self.buckets[b as usize].as_slice()))
    }
}
