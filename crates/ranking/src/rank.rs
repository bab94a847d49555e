//! Column and per-county feature rankings.

use std::cmp::Ordering;

use atlas_common::{AtlasError, AtlasResult, SelectionField};
use dataset_registry::{FeatureTable, YearlyDataset};
use serde::Serialize;
use tracing::debug;

/// Number of features shown in the drill-down list.
pub const DEFAULT_TOP_FEATURES: usize = 5;

/// A feature column and its maximum value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMax {
    pub feature: String,

    /// Column maximum, NaN when the column has no finite value
    pub max: f64,
}

// Descending, with NaN after every number.
fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Feature columns ordered by their maximum value, highest first.
///
/// The sort is stable, so equal maxima keep table column order. The first
/// entry is the default factor of the picker.
pub fn top_values_by_column(table: &FeatureTable) -> Vec<ColumnMax> {
    let mut maxima: Vec<ColumnMax> = table
        .features()
        .iter()
        .enumerate()
        .map(|(col, feature)| {
            let max = table
                .records()
                .iter()
                .map(|r| r.values[col])
                .filter(|v| !v.is_nan())
                .fold(f64::NAN, f64::max);
            ColumnMax {
                feature: feature.clone(),
                max,
            }
        })
        .collect();

    maxima.sort_by(|a, b| descending_nan_last(a.max, b.max));
    maxima
}

/// The top `n` features for one row of a year's attribution table.
///
/// A precomputed ranking is authoritative and returned as-is, truncated to
/// `n`. Without one, the row's attribution values are ranked by magnitude
/// (stable on ties, NaN excluded). Returns `None` if `row` is out of range.
pub fn top_features_for_record(dataset: &YearlyDataset, row: usize, n: usize) -> Option<Vec<String>> {
    if let Some(ranked) = dataset.top_features(row) {
        return Some(ranked.iter().take(n).cloned().collect());
    }

    let table = dataset.shap_values();
    let record = table.record(row)?;

    let mut scored: Vec<(&String, f64)> = table
        .features()
        .iter()
        .zip(record.values.iter().copied())
        .filter(|(_, v)| !v.is_nan())
        .collect();
    scored.sort_by(|a, b| descending_nan_last(a.1.abs(), b.1.abs()));

    debug!(year = %dataset.year(), row, "Ranked features from attribution values");
    Some(scored.into_iter().take(n).map(|(f, _)| f.clone()).collect())
}

/// The top `n` features for the first row matching a state/county pair.
pub fn top_features_for_county(
    dataset: &YearlyDataset,
    state: &str,
    county: &str,
    n: usize,
) -> AtlasResult<Vec<String>> {
    let table = dataset.shap_values();

    let mut counties: Vec<String> = table
        .rows_in_state(state)
        .map(|(_, r)| r.county.clone())
        .collect();
    if counties.is_empty() {
        let mut states: Vec<String> = table.records().iter().map(|r| r.state.clone()).collect();
        states.sort();
        states.dedup();
        return Err(AtlasError::UnknownState {
            state: state.to_string(),
            available: states,
        });
    }

    match table.find_county(state, county) {
        Some((row, _)) => Ok(top_features_for_record(dataset, row, n).unwrap_or_default()),
        None => {
            counties.sort();
            counties.dedup();
            Err(AtlasError::invalid(SelectionField::County, county, counties))
        }
    }
}
