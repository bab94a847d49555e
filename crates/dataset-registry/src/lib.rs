//! Dataset registry for the county attribution atlas.
//!
//! Holds one [`YearlyDataset`] per year: an attribution table, a raw-value
//! table with the same county rows, and optionally the precomputed per-county
//! feature ranking. Everything is validated once at load and read-only
//! afterwards.

pub mod artifact;
pub mod registry;
pub mod table;

pub use artifact::{Artifact, RawTable, RawYearlyDataset};
pub use registry::{DatasetRegistry, YearlyDataset};
pub use table::{CountyRecord, FeatureTable, TableKind};
