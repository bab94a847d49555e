//! Value ranges over feature cells.

use atlas_common::{AtlasError, AtlasResult, SelectionField};
use dataset_registry::FeatureTable;
use serde::Serialize;

/// Inclusive `[min, max]` over finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Range of a sequence of values, skipping NaN.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<ValueRange>, v| {
                Some(match acc {
                    Some(r) => ValueRange {
                        min: r.min.min(v),
                        max: r.max.max(v),
                    },
                    None => ValueRange { min: v, max: v },
                })
            })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Global min/max over every feature cell of a table.
///
/// This is the color domain shared by all factors of a year: switching the
/// displayed factor never rescales the legend. Metadata columns are never
/// part of the scan. Returns `None` when the table has no finite feature
/// value.
pub fn value_range(table: &FeatureTable) -> Option<ValueRange> {
    ValueRange::of(
        table
            .records()
            .iter()
            .flat_map(|record| record.values.iter().copied()),
    )
}

/// Min/max of a single feature column.
pub fn column_range(table: &FeatureTable, column: &str) -> AtlasResult<Option<ValueRange>> {
    let values = table.column(column).ok_or_else(|| {
        AtlasError::invalid(SelectionField::Factor, column, table.features().to_vec())
    })?;
    Ok(ValueRange::of(values))
}
