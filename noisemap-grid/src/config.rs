//! Grid index configuration types.
//!
//! A [`GridConfig`] is everything needed to lay out a lattice: the world
//! rectangle it covers and how many cells run along each axis. The struct is
//! serde-friendly so a lattice layout can live next to the rest of a
//! computation's settings.

use crate::error::{GridError, Result};
use geo_types::{coord, Rect};
use serde::{Deserialize, Serialize};

/// World-space bounding rectangle of the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl EnvelopeConfig {
    /// Create a new envelope from its corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width along X.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height along Y.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check that the envelope has strictly positive, finite extent.
    pub fn validate(&self) -> Result<()> {
        let corners = [self.min_x, self.min_y, self.max_x, self.max_y];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(GridError::InvalidConfiguration(format!(
                "envelope has non-finite coordinates: {:?}",
                self
            )));
        }
        let (width, height) = (self.width(), self.height());
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(GridError::InvalidConfiguration(format!(
                "envelope must have positive width and height, got {}x{}",
                width, height
            )));
        }
        Ok(())
    }

    /// Convert to a geo-types rectangle.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        )
    }
}

impl From<Rect<f64>> for EnvelopeConfig {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

/// Lattice layout for a [`GridIndex`](crate::GridIndex).
///
/// `columns` subdivide the X axis, `rows` the Y axis. Both must be at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Region covered by the lattice.
    pub envelope: EnvelopeConfig,

    /// Number of cells along X.
    pub columns: usize,

    /// Number of cells along Y.
    pub rows: usize,
}

impl GridConfig {
    /// Create a config with explicit cell counts.
    pub fn new(envelope: impl Into<EnvelopeConfig>, columns: usize, rows: usize) -> Self {
        Self {
            envelope: envelope.into(),
            columns,
            rows,
        }
    }

    /// Derive cell counts so no cell is wider or taller than `cell_size`.
    ///
    /// Each axis gets at least one cell. A non-positive or non-finite size
    /// leaves both counts at zero, which `validate` then rejects.
    pub fn with_cell_size(envelope: impl Into<EnvelopeConfig>, cell_size: f64) -> Self {
        let envelope = envelope.into();
        let count = |extent: f64| {
            if cell_size > 0.0 && cell_size.is_finite() && extent.is_finite() {
                ((extent / cell_size).ceil() as usize).max(1)
            } else {
                0
            }
        };
        Self {
            columns: count(envelope.width()),
            rows: count(envelope.height()),
            envelope,
        }
    }

    /// Replace the cell counts.
    pub fn with_resolution(mut self, columns: usize, rows: usize) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Total number of cells in the lattice.
    pub fn cell_count(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }

    /// Validate the layout.
    ///
    /// Rejects zero cell counts, degenerate envelopes, and lattices with
    /// more cells than a slot index can address.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(GridError::InvalidConfiguration(format!(
                "cell counts must be at least 1, got {} columns x {} rows",
                self.columns, self.rows
            )));
        }
        self.envelope.validate()?;
        match self.columns.checked_mul(self.rows) {
            Some(n) if n < u32::MAX as usize => Ok(()),
            _ => Err(GridError::InvalidConfiguration(format!(
                "lattice of {} x {} cells is too large",
                self.columns, self.rows
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        let config = GridConfig::new(EnvelopeConfig::new(0.0, 0.0, 100.0, 50.0), 10, 5);
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_count(), 50);
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let env = EnvelopeConfig::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            GridConfig::new(env, 0, 4).validate(),
            Err(GridError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GridConfig::new(env, 4, 0).validate(),
            Err(GridError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_degenerate_envelope() {
        for env in [
            EnvelopeConfig::new(0.0, 0.0, 0.0, 10.0),
            EnvelopeConfig::new(0.0, 0.0, 10.0, 0.0),
            EnvelopeConfig::new(10.0, 0.0, 0.0, 10.0),
            EnvelopeConfig::new(0.0, f64::NAN, 10.0, 10.0),
            EnvelopeConfig::new(0.0, 0.0, f64::INFINITY, 10.0),
        ] {
            let result = GridConfig::new(env, 2, 2).validate();
            assert!(
                matches!(result, Err(GridError::InvalidConfiguration(_))),
                "{:?} should be rejected",
                env
            );
        }
    }

    #[test]
    fn test_validate_rejects_oversized_lattice() {
        let env = EnvelopeConfig::new(0.0, 0.0, 1.0, 1.0);
        let config = GridConfig::new(env, 1 << 20, 1 << 20);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_cell_size() {
        let env = EnvelopeConfig::new(0.0, 0.0, 95.0, 40.0);
        let config = GridConfig::with_cell_size(env, 10.0);
        assert_eq!(config.columns, 10);
        assert_eq!(config.rows, 4);

        let tiny = GridConfig::with_cell_size(env, 1000.0);
        assert_eq!((tiny.columns, tiny.rows), (1, 1));

        let bad = GridConfig::with_cell_size(env, 0.0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "envelope": { "min_x": -10.0, "min_y": -10.0, "max_x": 10.0, "max_y": 10.0 },
            "columns": 4,
            "rows": 8
        }"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.columns, 4);
        assert_eq!(config.rows, 8);
        assert_eq!(config.envelope.width(), 20.0);
        assert!(config.validate().is_ok());
    }
}
