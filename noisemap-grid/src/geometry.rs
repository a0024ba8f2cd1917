//! Shapes accepted by the index and WKT parsing.
//!
//! The index never looks inside a shape. It needs exactly two things from
//! one: a bounding rectangle to find candidate cells, and an exact
//! shape-vs-rectangle test to decide which candidates the shape really
//! occupies. [`IndexShape`] captures that, and every `geo` geometry type
//! gets it for free.
//!
//! # Boundary convention
//!
//! The exact test is `geo`'s [`Intersects`], which treats geometries as
//! closed sets: a shape that only touches a cell along an edge or at a
//! corner intersects that cell.
//!
//! Candidate cell ranges are half-open, though. A shape whose bounding box
//! ends exactly on a cell boundary never has the cell beyond that boundary
//! tested, so it is not recorded there even though it touches it. A
//! `rect(0, 0, 10, 10)` polygon on a lattice of 10-unit cells is recorded
//! in cell `(0, 0)` only, not in its edge neighbors `(0, 1)` and `(1, 0)`.

use crate::error::{GridError, Result};
use geo::{BoundingRect, Intersects};
use geo_types::{coord, Geometry, Rect};

/// A planar shape that can be rasterized into the grid.
pub trait IndexShape {
    /// Bounding rectangle, or `None` for an empty shape.
    fn envelope(&self) -> Option<Rect<f64>>;

    /// Exact test against an axis-aligned rectangle.
    fn intersects_cell(&self, cell: &Rect<f64>) -> bool;
}

impl<G> IndexShape for G
where
    G: BoundingRect<f64> + Intersects<Rect<f64>>,
    G::Output: Into<Option<Rect<f64>>>,
{
    fn envelope(&self) -> Option<Rect<f64>> {
        self.bounding_rect().into()
    }

    fn intersects_cell(&self, cell: &Rect<f64>) -> bool {
        self.intersects(cell)
    }
}

/// Build a rectangle from its corner coordinates.
pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect<f64> {
    Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y })
}

/// Parse WKT string to geo-types Geometry.
pub fn parse_wkt(wkt: &str) -> Result<Geometry<f64>> {
    use std::str::FromStr;
    wkt::Wkt::from_str(wkt)
        .map_err(|e| GridError::WktParse(format!("{:?}", e)))
        .and_then(|w| {
            w.try_into()
                .map_err(|e: wkt::conversion::Error| GridError::WktParse(format!("{:?}", e)))
        })
}
