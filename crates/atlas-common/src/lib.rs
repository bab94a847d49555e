//! Common types and utilities shared across all county-atlas crates.

pub mod error;
pub mod fips;
pub mod style;
pub mod year;

pub use error::{AtlasError, AtlasResult, SelectionField};
pub use fips::Fips;
pub use style::{Color, ColorScale, ColorStop};
pub use year::Year;

/// Metadata column holding the county name.
pub const COUNTY_COLUMN: &str = "County";

/// Metadata column holding the state abbreviation.
pub const STATE_COLUMN: &str = "State";

/// Metadata column holding the 5-digit county FIPS code.
pub const FIPS_COLUMN: &str = "County_FIPS";

/// Metadata column holding the outcome metric shown in hovers and the drill-down map.
pub const OUTCOME_COLUMN: &str = "DiagnosedDiabetes(Percentage)";

/// Optional column carrying precomputed per-county feature rankings.
pub const TOP_FEATURES_COLUMN: &str = "Top_Features";

/// Number of trailing metadata columns in every dataset table.
pub const METADATA_WIDTH: usize = 6;

/// Metadata columns that must appear among the trailing [`METADATA_WIDTH`] columns.
pub const REQUIRED_METADATA: [&str; 4] = [COUNTY_COLUMN, STATE_COLUMN, FIPS_COLUMN, OUTCOME_COLUMN];
