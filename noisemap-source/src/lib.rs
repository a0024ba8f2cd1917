//! Road traffic noise emission.
//!
//! Computes the dB(A) emission level of a road segment from its traffic
//! speed and hourly light/heavy vehicle counts. Rolling (tyre/road, R2
//! surface) and engine noise are evaluated per vehicle class, combined by
//! energetic sum, scaled by the class flow, and summed again across classes.
//!
//! The functions are pure and stateless. Typical use is to evaluate each
//! road feature once and key the level by the same feature id that the grid
//! index stores.

pub mod error;
mod level;

pub use error::{Result, SourceError};
pub use level::{
    dba_to_energy, energetic_sum, energy_to_dba, evaluate_source_v1, SourceLevel, TrafficFlow,
};
