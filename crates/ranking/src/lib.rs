//! Range and ranking engine.
//!
//! Numeric summaries over a year's tables: the color-scale domain, the
//! per-column maxima that order the factor picker, and the per-county top
//! feature lists for the drill-down view.

pub mod rank;
pub mod range;

pub use rank::{
    top_features_for_county, top_features_for_record, top_values_by_column, ColumnMax,
    DEFAULT_TOP_FEATURES,
};
pub use range::{column_range, value_range, ValueRange};
