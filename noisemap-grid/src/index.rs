//! Grid index and its insertion path.
//!
//! Inserting a shape:
//! 1. Takes the shape's bounding rectangle
//! 2. Maps it to a candidate cell range on the lattice
//! 3. Runs an exact shape-vs-cell test for every candidate
//! 4. Records the feature id in each cell that passes
//!
//! The exact test in step 3 keeps the id out of cells that only the bounding
//! box reaches, typically the far corners of the candidate range for
//! diagonal or concave shapes.
//!
//! # Usage
//!
//! ```ignore
//! let config = GridConfig::new(EnvelopeConfig::new(0.0, 0.0, 1000.0, 1000.0), 50, 50);
//! let mut index = GridIndex::from_config(&config)?;
//!
//! index.insert(&road_polygon, 17);
//! index.insert_wkt(18, "LINESTRING(10 10, 400 220)")?;
//!
//! let candidates = index.query(&rect(100.0, 100.0, 200.0, 200.0));
//! ```

use crate::cell_table::CellTable;
use crate::config::{EnvelopeConfig, GridConfig};
use crate::error::Result;
use crate::geometry::{parse_wkt, IndexShape};
use crate::lattice::Lattice;
use crate::FeatureId;
use geo_types::Rect;

/// Statistics collected while building the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of insert calls (including WKT records).
    pub features_processed: u64,

    /// Number of features recorded in at least one cell.
    pub features_indexed: u64,

    /// Number of features that landed in no cell (empty, off-lattice,
    /// or unparseable WKT).
    pub features_skipped: u64,

    /// Candidate cells put through the exact intersection test.
    pub candidate_cells: u64,

    /// Cell entries recorded.
    pub cell_entries: u64,
}

impl BuildStats {
    /// Fraction of candidate cells that passed the exact test.
    ///
    /// Low values mean the bounding-box prefilter is loose for this data.
    pub fn hit_ratio(&self) -> f64 {
        if self.candidate_cells == 0 {
            0.0
        } else {
            self.cell_entries as f64 / self.candidate_cells as f64
        }
    }
}

/// Uniform-grid spatial index over opaque feature ids.
///
/// Built with [`insert`](Self::insert) and read with
/// [`query`](Self::query). Inserts take `&mut self` and queries `&self`, so
/// once building stops the index can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct GridIndex {
    lattice: Lattice,
    cells: CellTable,
    stats: BuildStats,
}

impl GridIndex {
    /// Create an empty index over `envelope` split into `columns x rows` cells.
    pub fn new(envelope: Rect<f64>, columns: usize, rows: usize) -> Result<Self> {
        Self::from_config(&GridConfig::new(EnvelopeConfig::from(envelope), columns, rows))
    }

    /// Create an empty index from a config.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        let lattice = Lattice::new(config)?;
        tracing::debug!(
            columns = lattice.columns(),
            rows = lattice.rows(),
            cell_width = lattice.cell_width(),
            cell_height = lattice.cell_height(),
            "Created grid index"
        );
        Ok(Self {
            cells: CellTable::new(lattice.cell_count()),
            lattice,
            stats: BuildStats::default(),
        })
    }

    /// Lattice layout.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Current build statistics.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Record `id` in every cell the shape truly intersects.
    ///
    /// Only cells in the half-open candidate range of the shape's bounding
    /// box are tested. A shape that merely touches the far edge of that
    /// range (its bounding box ends exactly on a cell boundary) is not
    /// recorded in the cell beyond the edge. See the
    /// [`geometry`](crate::geometry) module's boundary convention.
    ///
    /// Returns the number of cells the id was recorded in. Empty shapes and
    /// shapes lying off the lattice record nothing.
    pub fn insert<S>(&mut self, shape: &S, id: FeatureId) -> usize
    where
        S: IndexShape + ?Sized,
    {
        self.stats.features_processed += 1;

        let Some(envelope) = shape.envelope() else {
            self.stats.features_skipped += 1;
            tracing::trace!(feature_id = id, "Skipping empty shape");
            return 0;
        };

        let range = self.lattice.candidate_range(&envelope);
        let mut recorded = 0;
        for (row, col) in range.cells() {
            let cell = self.lattice.cell_envelope(row, col);
            if shape.intersects_cell(&cell) {
                self.cells.record(self.lattice.slot(row, col), id);
                recorded += 1;
            }
        }

        self.stats.candidate_cells += range.len() as u64;
        self.stats.cell_entries += recorded as u64;
        if recorded == 0 {
            self.stats.features_skipped += 1;
            tracing::trace!(
                feature_id = id,
                candidates = range.len(),
                "Shape occupies no lattice cell"
            );
        } else {
            self.stats.features_indexed += 1;
        }
        recorded
    }

    /// Parse a WKT record and insert it.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the geometry was recorded in at least one cell
    /// - `Ok(false)` if skipped (WKT parse error, empty or off-lattice shape)
    ///
    /// Parse errors are logged and counted in `stats.features_skipped`, not
    /// propagated. This allows batch loading to continue on malformed input.
    pub fn insert_wkt(&mut self, id: FeatureId, wkt: &str) -> Result<bool> {
        let geom = match parse_wkt(wkt) {
            Ok(g) => g,
            Err(e) => {
                self.stats.features_processed += 1;
                self.stats.features_skipped += 1;
                tracing::debug!(feature_id = id, error = %e, "Failed to parse WKT");
                return Ok(false);
            }
        };
        Ok(self.insert(&geom, id) > 0)
    }

    /// Ids recorded in cell `(row, col)`; empty for unoccupied or
    /// out-of-lattice cells.
    pub fn cell_features(&self, row: usize, col: usize) -> &[FeatureId] {
        if row >= self.lattice.rows() || col >= self.lattice.columns() {
            return &[];
        }
        self.cells
            .bucket(self.lattice.slot(row, col))
            .unwrap_or_default()
    }

    /// Iterate `((row, col), ids)` for every occupied cell, row-major.
    pub fn occupied_cells(&self) -> impl Iterator<Item = ((usize, usize), &[FeatureId])> + '_ {
        let columns = self.lattice.columns();
        self.cells
            .occupied()
            .map(move |(slot, ids)| ((slot / columns, slot % columns), ids))
    }

    /// Number of cells holding at least one id.
    pub fn bucket_count(&self) -> usize {
        self.cells.bucket_count()
    }

    /// Total cell entries across all buckets.
    pub fn entry_count(&self) -> usize {
        self.cells.entry_count()
    }

    pub(crate) fn cells(&self) -> &CellTable {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::geometry::rect;
    use geo_types::{line_string, point, polygon, Geometry, LineString};

    fn index_100() -> GridIndex {
        GridIndex::new(rect(0.0, 0.0, 100.0, 100.0), 10, 10).unwrap()
    }

    #[test]
    fn test_new_rejects_degenerate_envelope() {
        let result = GridIndex::new(rect(0.0, 0.0, 0.0, 100.0), 10, 10);
        assert!(matches!(result, Err(GridError::InvalidConfiguration(_))));
        let result = GridIndex::new(rect(0.0, 0.0, 100.0, 100.0), 0, 10);
        assert!(matches!(result, Err(GridError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_insert_square_fills_all_candidates() {
        let mut index = index_100();
        let square = rect(5.0, 5.0, 15.0, 15.0).to_polygon();
        assert_eq!(index.insert(&square, 1), 4);

        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert_eq!(index.cell_features(row, col), &[1]);
        }
        assert!(index.cell_features(2, 2).is_empty());
        assert_eq!(index.bucket_count(), 4);
    }

    #[test]
    fn test_insert_diagonal_skips_corner_cells() {
        let mut index = index_100();
        // x + y = 26 never reaches cell (0,0), whose largest x + y is 20.
        let line = line_string![(x: 8.0, y: 18.0), (x: 18.0, y: 8.0)];
        assert_eq!(index.insert(&line, 7), 3);

        assert!(index.cell_features(0, 0).is_empty());
        assert_eq!(index.cell_features(1, 0), &[7]);
        assert_eq!(index.cell_features(0, 1), &[7]);
        assert_eq!(index.cell_features(1, 1), &[7]);
        assert_eq!(index.stats().candidate_cells, 4);
        assert_eq!(index.stats().cell_entries, 3);
    }

    #[test]
    fn test_insert_triangle_excludes_far_corner() {
        let mut index = index_100();
        let triangle = polygon![
            (x: 1.0, y: 1.0),
            (x: 28.0, y: 1.0),
            (x: 1.0, y: 28.0),
        ];
        index.insert(&triangle, 3);

        assert_eq!(index.cell_features(0, 0), &[3]);
        assert_eq!(index.cell_features(0, 2), &[3]);
        assert_eq!(index.cell_features(2, 0), &[3]);
        assert!(index.cell_features(2, 2).is_empty());
        assert!(index.cell_features(1, 2).is_empty());
        assert!(index.cell_features(2, 1).is_empty());
    }

    #[test]
    fn test_insert_edge_touching_cells_beyond_range_not_recorded() {
        let mut index = index_100();
        let square = rect(0.0, 0.0, 10.0, 10.0).to_polygon();
        let right = index.lattice().cell_envelope(0, 1);
        let above = index.lattice().cell_envelope(1, 0);
        assert!(square.intersects_cell(&right));
        assert!(square.intersects_cell(&above));

        assert_eq!(index.insert(&square, 1), 1);
        assert_eq!(index.cell_features(0, 0), &[1]);
        assert!(index.cell_features(0, 1).is_empty());
        assert!(index.cell_features(1, 0).is_empty());
        assert!(index.query(&right).is_empty());
        assert_eq!(index.query(&index.lattice().cell_envelope(0, 0)), vec![1]);
    }

    #[test]
    fn test_insert_and_query_far_away_point() {
        let mut index = index_100();
        assert_eq!(index.insert(&point! { x: 1e20, y: 1e20 }, 1), 0);
        assert_eq!(index.insert(&point! { x: -1e20, y: 1e20 }, 2), 0);
        assert_eq!(index.bucket_count(), 0);
        assert_eq!(index.stats().features_skipped, 2);
        assert!(index.query(&rect(1e20, 1e20, 1e20, 1e20)).is_empty());
    }

    #[test]
    fn test_insert_point() {
        let mut index = index_100();
        assert_eq!(index.insert(&point! { x: 55.0, y: 42.0 }, 2), 1);
        assert_eq!(index.cell_features(4, 5), &[2]);
    }

    #[test]
    fn test_insert_outside_is_noop() {
        let mut index = index_100();
        let square = rect(200.0, 200.0, 300.0, 300.0).to_polygon();
        assert_eq!(index.insert(&square, 9), 0);
        assert_eq!(index.bucket_count(), 0);
        assert_eq!(index.stats().features_skipped, 1);
        assert_eq!(index.stats().features_indexed, 0);
    }

    #[test]
    fn test_insert_empty_shape_is_noop() {
        let mut index = index_100();
        let empty: LineString<f64> = LineString::new(vec![]);
        assert_eq!(index.insert(&empty, 1), 0);
        assert_eq!(index.entry_count(), 0);
        assert_eq!(index.stats().features_skipped, 1);
    }

    #[test]
    fn test_insert_shape_larger_than_lattice() {
        let mut index = GridIndex::new(rect(0.0, 0.0, 40.0, 40.0), 4, 4).unwrap();
        let huge = rect(-1000.0, -1000.0, 1000.0, 1000.0).to_polygon();
        assert_eq!(index.insert(&huge, 5), 16);
        assert_eq!(index.stats().candidate_cells, 16);
    }

    #[test]
    fn test_single_insert_never_duplicates_in_a_cell() {
        let mut index = index_100();
        let poly = rect(0.0, 0.0, 100.0, 100.0).to_polygon();
        index.insert(&poly, 42);
        for row in 0..10 {
            for col in 0..10 {
                assert_eq!(index.cell_features(row, col), &[42]);
            }
        }
    }

    #[test]
    fn test_insert_geometry_enum() {
        let mut index = index_100();
        let geom: Geometry<f64> = point! { x: 1.0, y: 1.0 }.into();
        assert_eq!(index.insert(&geom, 11), 1);
        assert_eq!(index.cell_features(0, 0), &[11]);
    }

    #[test]
    fn test_insert_wkt() {
        let mut index = index_100();
        assert!(index
            .insert_wkt(1, "POLYGON((1 1, 9 1, 9 9, 1 9, 1 1))")
            .unwrap());
        assert!(!index.insert_wkt(2, "POLYGON((1 1, 9").unwrap());
        assert!(!index.insert_wkt(3, "POINT(500 500)").unwrap());

        let stats = index.stats();
        assert_eq!(stats.features_processed, 3);
        assert_eq!(stats.features_indexed, 1);
        assert_eq!(stats.features_skipped, 2);
        assert_eq!(index.cell_features(0, 0), &[1]);
    }

    #[test]
    fn test_cell_features_out_of_range() {
        let index = index_100();
        assert!(index.cell_features(10, 0).is_empty());
        assert!(index.cell_features(0, 10).is_empty());
    }

    #[test]
    fn test_occupied_cells_row_col() {
        let mut index = GridIndex::new(rect(0.0, 0.0, 30.0, 20.0), 3, 2).unwrap();
        index.insert(&point! { x: 25.0, y: 15.0 }, 1);
        index.insert(&point! { x: 5.0, y: 5.0 }, 2);
        let occupied: Vec<_> = index.occupied_cells().collect();
        assert_eq!(occupied, vec![((0, 0), &[2][..]), ((1, 2), &[1][..])]);
    }

    #[test]
    fn test_hit_ratio() {
        let mut index = index_100();
        assert_eq!(index.stats().hit_ratio(), 0.0);
        let line = line_string![(x: 8.0, y: 18.0), (x: 18.0, y: 8.0)];
        index.insert(&line, 1);
        assert!((index.stats().hit_ratio() - 0.75).abs() < 1e-12);
    }
}
