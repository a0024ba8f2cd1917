//! Lattice geometry: world rectangles to cell index ranges and back.
//!
//! The lattice splits the main envelope into `rows x columns` equal cells.
//! Rows run along Y, columns along X, and cell `(row, col)` lives at slot
//! `row * columns + col` of the cell table.
//!
//! Mapping a world rectangle to cells works relative to the lattice center:
//!
//! ```text
//! min_index = floor((min - center) / cell_size + n / 2)
//! max_index = ceil((max - center) / cell_size + n / 2)
//! ```
//!
//! The result is half-open (`[min, max)`), widened to one cell when both
//! ends collapse onto the same cell boundary, then clamped to `[0, n]`.
//! A rectangle that lies off the lattice clamps to an empty range.

use crate::config::GridConfig;
use crate::error::Result;
use geo_types::{coord, Coord, Rect};
use std::ops::Range;

/// Half-open span of cells a rectangle may overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    /// Row span (Y axis).
    pub rows: Range<usize>,
    /// Column span (X axis).
    pub columns: Range<usize>,
}

impl CellRange {
    /// True when the range holds no cell.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Number of cells in the range.
    pub fn len(&self) -> usize {
        self.rows.len() * self.columns.len()
    }

    /// Iterate `(row, col)` pairs in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .clone()
            .flat_map(move |row| self.columns.clone().map(move |col| (row, col)))
    }
}

/// Fixed lattice layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    envelope: Rect<f64>,
    center: Coord<f64>,
    rows: usize,
    columns: usize,
    cell_width: f64,
    cell_height: f64,
}

impl Lattice {
    /// Build a lattice from a validated config.
    pub fn new(config: &GridConfig) -> Result<Self> {
        config.validate()?;
        let envelope = config.envelope.to_rect();
        Ok(Self {
            envelope,
            center: envelope.center(),
            rows: config.rows,
            columns: config.columns,
            cell_width: envelope.width() / config.columns as f64,
            cell_height: envelope.height() / config.rows as f64,
        })
    }

    pub fn envelope(&self) -> Rect<f64> {
        self.envelope
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Width of one cell (X axis).
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Height of one cell (Y axis).
    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Number of cells, `rows * columns`.
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Row-major slot of a cell. Callers keep `col < columns`.
    #[inline]
    pub(crate) fn slot(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Candidate cells for a world-space rectangle.
    pub fn candidate_range(&self, rect: &Rect<f64>) -> CellRange {
        let (min, max) = (rect.min(), rect.max());
        let rows = axis_range(
            min.y,
            max.y,
            self.center.y,
            self.cell_height,
            self.rows,
        );
        let columns = axis_range(
            min.x,
            max.x,
            self.center.x,
            self.cell_width,
            self.columns,
        );
        CellRange { rows, columns }
    }

    /// Exact world rectangle of cell `(row, col)`.
    pub fn cell_envelope(&self, row: usize, col: usize) -> Rect<f64> {
        let origin = self.envelope.min();
        let min_x = origin.x + self.cell_width * col as f64;
        let min_y = origin.y + self.cell_height * row as f64;
        Rect::new(
            coord! { x: min_x, y: min_y },
            coord! { x: min_x + self.cell_width, y: min_y + self.cell_height },
        )
    }

    /// Cell containing a world point, if the point lies on the lattice.
    ///
    /// Points on an interior cell edge belong to the cell above/right of it.
    pub fn cell_at(&self, point: Coord<f64>) -> Option<(usize, usize)> {
        let range = self.candidate_range(&Rect::new(point, point));
        if range.is_empty() {
            None
        } else {
            Some((range.rows.start, range.columns.start))
        }
    }
}

fn axis_range(min: f64, max: f64, center: f64, cell_size: f64, count: usize) -> Range<usize> {
    let half = count as f64 / 2.0;
    // Indices beyond one cell off either end all clamp to the same empty
    // range, so bound them before the integer cast.
    let bound = |v: f64| v.clamp(-1.0, count as f64 + 1.0) as i64;
    let mut lo = bound(((min - center) / cell_size + half).floor());
    let mut hi = bound(((max - center) / cell_size + half).ceil());
    if lo == hi {
        hi += 1;
    }
    let count = count as i64;
    lo = lo.clamp(0, count);
    hi = hi.clamp(0, count);
    lo as usize..hi as usize
}
