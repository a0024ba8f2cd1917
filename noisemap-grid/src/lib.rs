//! Uniform-grid spatial index for noise map features.
//!
//! The index lays a fixed lattice of equal rectangular cells over a region
//! and records, for every inserted shape, the cells that shape truly
//! intersects. "Which features might overlap this window?" then becomes a
//! walk over a handful of cells instead of a test against every feature.
//!
//! # Architecture
//!
//! ```text
//!          insert(shape, id)                     query(window)
//!                 │                                    │
//!                 ▼                                    ▼
//!        ┌────────────────────┐             ┌────────────────────┐
//!        │  Lattice           │  candidate  │  Lattice           │
//!        │  (bbox → cells)    │    range    │  (window → cells)  │
//!        └────────────────────┘             └────────────────────┘
//!                 │                                    │
//!                 ▼                                    ▼
//!      exact shape/cell test (geo)            FeatureUnion (dedup)
//!                 │                                    ▲
//!                 ▼                                    │
//!        ┌──────────────────────────────────────────────────────┐
//!        │  CellTable: slot per cell → lazily allocated bucket  │
//!        └──────────────────────────────────────────────────────┘
//! ```
//!
//! The lattice resolution is the tuning knob: finer cells make query results
//! tighter but multiply the exact tests paid on insert.
//!
//! Building is single-writer (`insert` takes `&mut self`); once built, the
//! index is read-only and can be queried from any number of threads.
//!
//! # Modules
//!
//! - [`config`]: Lattice configuration types
//! - [`geometry`]: Shape trait and WKT parsing
//! - [`lattice`]: World ↔ cell coordinate mapping
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod geometry;
pub mod lattice;

mod cell_table;
pub(crate) mod dedup;
mod index;
mod query;

/// Caller-defined feature identifier.
///
/// The index attaches no meaning to it beyond storing and returning it.
pub type FeatureId = u64;

// Re-export key types
pub use config::{EnvelopeConfig, GridConfig};
pub use error::{GridError, Result};
pub use geometry::{parse_wkt, rect, IndexShape};
pub use index::{BuildStats, GridIndex};
pub use lattice::{CellRange, Lattice};
pub use query::QueryStats;
