//! Emission level formulas.
//!
//! Every partial level follows `base + slope * ln(v / v_ref)`, with
//! `v_ref = 90 km/h` for light vehicles and `80 km/h` for heavy ones.
//!
//! | class | component | speed band     | base | slope |
//! |-------|-----------|----------------|------|-------|
//! | light | rolling   | any            | 55.4 | 20.1  |
//! | light | engine    | v < 30         | 36.7 | -10.0 |
//! | light | engine    | 30 <= v < 110  | 42.4 | 2.0   |
//! | light | engine    | v >= 110       | 40.7 | 21.3  |
//! | heavy | rolling   | any            | 63.4 | 20.0  |
//! | heavy | engine    | v < 70         | 49.6 | -10.0 |
//! | heavy | engine    | v >= 70        | 50.4 | 3.0   |

use crate::error::{Result, SourceError};
use serde::{Deserialize, Serialize};

const LIGHT_REF_SPEED: f64 = 90.0;
const HEAVY_REF_SPEED: f64 = 80.0;

/// Traffic on one road source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficFlow {
    /// Mean traffic speed in km/h.
    pub speed_kmh: f64,
    /// Light vehicles per hour.
    pub light_per_hour: u32,
    /// Heavy vehicles per hour.
    pub heavy_per_hour: u32,
}

/// Emission levels of one source, in dB(A).
///
/// A class with zero flow has a level of `-inf` (no energy).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceLevel {
    pub light: f64,
    pub heavy: f64,
    pub total: f64,
}

impl TrafficFlow {
    pub fn new(speed_kmh: f64, light_per_hour: u32, heavy_per_hour: u32) -> Self {
        Self {
            speed_kmh,
            light_per_hour,
            heavy_per_hour,
        }
    }

    /// Evaluate per-class and total emission.
    pub fn evaluate(&self) -> Result<SourceLevel> {
        let v = self.speed_kmh;
        if !(v.is_finite() && v > 0.0) {
            return Err(SourceError::InvalidSpeed(v));
        }

        let light_rolling = partial_level(55.4, 20.1, v, LIGHT_REF_SPEED);
        let light_engine = if v < 30.0 {
            partial_level(36.7, -10.0, v, LIGHT_REF_SPEED)
        } else if v < 110.0 {
            partial_level(42.4, 2.0, v, LIGHT_REF_SPEED)
        } else {
            partial_level(40.7, 21.3, v, LIGHT_REF_SPEED)
        };

        let heavy_rolling = partial_level(63.4, 20.0, v, HEAVY_REF_SPEED);
        let heavy_engine = if v < 70.0 {
            partial_level(49.6, -10.0, v, HEAVY_REF_SPEED)
        } else {
            partial_level(50.4, 3.0, v, HEAVY_REF_SPEED)
        };

        let light = energetic_sum(light_rolling, light_engine) + flow_gain(self.light_per_hour);
        let heavy = energetic_sum(heavy_rolling, heavy_engine) + flow_gain(self.heavy_per_hour);

        Ok(SourceLevel {
            light,
            heavy,
            total: energetic_sum(light, heavy),
        })
    }
}

/// Total dB(A) emission for a speed and hourly light/heavy vehicle counts.
pub fn evaluate_source_v1(speed_kmh: f64, light_per_hour: u32, heavy_per_hour: u32) -> Result<f64> {
    TrafficFlow::new(speed_kmh, light_per_hour, heavy_per_hour)
        .evaluate()
        .map(|level| level.total)
}

/// dB(A) to relative acoustic energy.
#[inline]
pub fn dba_to_energy(dba: f64) -> f64 {
    10f64.powf(dba / 10.0)
}

/// Relative acoustic energy to dB(A).
#[inline]
pub fn energy_to_dba(energy: f64) -> f64 {
    10.0 * energy.log10()
}

/// Combine two levels by adding their energies.
#[inline]
pub fn energetic_sum(a: f64, b: f64) -> f64 {
    energy_to_dba(dba_to_energy(a) + dba_to_energy(b))
}

#[inline]
fn partial_level(base: f64, slope: f64, speed: f64, ref_speed: f64) -> f64 {
    base + slope * (speed / ref_speed).ln()
}

#[inline]
fn flow_gain(vehicles_per_hour: u32) -> f64 {
    10.0 * f64::from(vehicles_per_hour).log10()
}
