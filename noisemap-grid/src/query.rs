//! Query engine.
//!
//! A query maps the window to candidate cells with the same transform used
//! on insert, then unions the buckets of the occupied ones:
//!
//! ```text
//! window ──► candidate range ──► occupied buckets ──► FeatureUnion ──► ids
//!                                                                     │
//!                                 (optional) exact refine ◄───────────┘
//! ```
//!
//! Results are cell-granular: an id comes back when its shape intersects a
//! candidate cell, even if it misses the window itself.
//! [`GridIndex::query_refined`] re-tests each id against the window.

use crate::dedup::FeatureUnion;
use crate::geometry::IndexShape;
use crate::index::GridIndex;
use crate::FeatureId;
use geo_types::Rect;

/// Statistics from a query execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Cells in the candidate range.
    pub candidate_cells: usize,

    /// Candidate cells that held a bucket.
    pub occupied_cells: usize,

    /// Ids read from buckets, duplicates included.
    pub entries_scanned: usize,

    /// Unique ids returned.
    pub result_count: usize,
}

impl QueryStats {
    /// Duplicate pressure: entries_scanned / result_count.
    ///
    /// 1.0 means no feature spanned more than one visited cell.
    pub fn dedup_ratio(&self) -> f64 {
        if self.result_count == 0 {
            0.0
        } else {
            self.entries_scanned as f64 / self.result_count as f64
        }
    }
}

impl GridIndex {
    /// Ids of features recorded in any cell the window may overlap.
    ///
    /// Each id appears once. Order is unspecified.
    pub fn query(&self, window: &Rect<f64>) -> Vec<FeatureId> {
        self.query_with_stats(window).0
    }

    /// [`query`](Self::query) with detailed statistics.
    pub fn query_with_stats(&self, window: &Rect<f64>) -> (Vec<FeatureId>, QueryStats) {
        let range = self.lattice().candidate_range(window);
        let mut stats = QueryStats {
            candidate_cells: range.len(),
            ..Default::default()
        };

        let mut union = FeatureUnion::new();
        for (row, col) in range.cells() {
            if let Some(bucket) = self.cells().bucket(self.lattice().slot(row, col)) {
                stats.occupied_cells += 1;
                union.extend(bucket);
            }
        }

        stats.entries_scanned = union.scanned();
        let ids = union.finish();
        stats.result_count = ids.len();
        (ids, stats)
    }

    /// Query, then keep only ids whose shape truly intersects the window.
    ///
    /// `resolve` maps an id back to the caller's shape; ids it cannot
    /// resolve are dropped.
    pub fn query_refined<'a, S, F>(&self, window: &Rect<f64>, mut resolve: F) -> Vec<FeatureId>
    where
        S: IndexShape + ?Sized + 'a,
        F: FnMut(FeatureId) -> Option<&'a S>,
    {
        self.query(window)
            .into_iter()
            .filter(|&id| resolve(id).is_some_and(|shape| shape.intersects_cell(window)))
            .collect()
    }
}
