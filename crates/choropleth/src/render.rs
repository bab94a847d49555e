//! Geo-join of county rows onto boundary polygons.

use atlas_common::{AtlasError, AtlasResult, ColorScale, Fips, SelectionField, OUTCOME_COLUMN};
use boundaries::{BoundaryCollection, Bounds, CountyBoundary};
use dataset_registry::{CountyRecord, FeatureTable, YearlyDataset};
use ranking::{column_range, top_features_for_record, value_range, ValueRange};
use tracing::{debug, warn};

use crate::map_spec::{Hover, MapSpec, Region};

/// Rows joined to polygons, plus the rows that found none.
struct Joined<'a> {
    regions: Vec<Region<'a>>,
    unmatched: Vec<Fips>,
}

/// Join rows to boundaries by FIPS code.
///
/// `value` picks the colored value of a row; `top_features` fills the hover
/// list for a row index. A row whose FIPS has no boundary becomes a hole.
fn join<'a, 'r>(
    rows: impl Iterator<Item = (usize, &'r CountyRecord)>,
    boundary: impl Fn(&Fips) -> Option<&'a CountyBoundary>,
    value: impl Fn(&CountyRecord) -> f64,
    top_features: impl Fn(usize) -> Option<Vec<String>>,
    domain: Option<ValueRange>,
    scale: &ColorScale,
) -> Joined<'a> {
    let mut regions = Vec::new();
    let mut unmatched = Vec::new();

    for (row, record) in rows {
        let Some(boundary) = boundary(&record.fips) else {
            unmatched.push(record.fips.clone());
            continue;
        };

        let v = value(record);
        let fill = domain.and_then(|d| scale.color_for(v, d.min, d.max));
        regions.push(Region {
            fips: record.fips.clone(),
            value: v,
            fill,
            geometry: &boundary.geometry,
            hover: Hover {
                county: record.county.clone(),
                state: record.state.clone(),
                outcome: record.outcome,
                top_features: top_features(row),
            },
        });
    }

    if !unmatched.is_empty() {
        warn!(
            unmatched = unmatched.len(),
            joined = regions.len(),
            "Rows without a county boundary are drawn as holes"
        );
    }

    Joined { regions, unmatched }
}

fn regions_bounds(regions: &[Region<'_>]) -> Option<Bounds> {
    let boxes: Vec<Bounds> = regions.iter().filter_map(|r| r.geometry.bounds()).collect();
    Bounds::union_all(&boxes)
}

fn factor_column(table: &FeatureTable, factor: &str) -> AtlasResult<usize> {
    table.feature_index(factor).ok_or_else(|| {
        AtlasError::invalid(SelectionField::Factor, factor, table.features().to_vec())
    })
}

/// Attribution map for one factor.
///
/// The color domain is the range over every feature of the table, so all
/// factors of a year share one legend.
pub fn render<'a>(
    table: &FeatureTable,
    factor: &str,
    boundaries: &'a BoundaryCollection,
    scale: &ColorScale,
) -> AtlasResult<MapSpec<'a>> {
    let col = factor_column(table, factor)?;
    let domain = value_range(table);

    let joined = join(
        table.records().iter().enumerate(),
        |fips| boundaries.get(fips),
        |record| record.values[col],
        |_| None,
        domain,
        scale,
    );
    debug!(factor, regions = joined.regions.len(), "Rendered attribution map");

    Ok(MapSpec {
        title: format!(
            "{} SHAP Value County Level Impact on Diabetes Prevalence",
            factor
        ),
        legend_title: format!("SHAP Value: {}", factor),
        color_column: factor.to_string(),
        domain,
        scale: scale.clone(),
        bounds: regions_bounds(&joined.regions),
        regions: joined.regions,
        unmatched: joined.unmatched,
        fit_bounds: false,
    })
}

/// Raw-value map for one factor, scaled by that column alone.
pub fn render_raw<'a>(
    table: &FeatureTable,
    factor: &str,
    boundaries: &'a BoundaryCollection,
    scale: &ColorScale,
) -> AtlasResult<MapSpec<'a>> {
    let col = factor_column(table, factor)?;
    let domain = column_range(table, factor)?;

    let joined = join(
        table.records().iter().enumerate(),
        |fips| boundaries.get(fips),
        |record| record.values[col],
        |_| None,
        domain,
        scale,
    );
    debug!(factor, regions = joined.regions.len(), "Rendered raw-value map");

    Ok(MapSpec {
        title: format!("{} Raw Value", factor),
        legend_title: factor.to_string(),
        color_column: factor.to_string(),
        domain,
        scale: scale.clone(),
        bounds: regions_bounds(&joined.regions),
        regions: joined.regions,
        unmatched: joined.unmatched,
        fit_bounds: false,
    })
}

/// Prevalence map of one state, zoomed to its counties.
///
/// Boundaries are restricted to the state code of the state's first row.
/// Colors follow the outcome column over the state's own rows, and every
/// hover carries the county's top `top_n` features.
pub fn render_state_detail<'a>(
    dataset: &YearlyDataset,
    state: &str,
    boundaries: &'a BoundaryCollection,
    scale: &ColorScale,
    top_n: usize,
) -> AtlasResult<MapSpec<'a>> {
    let table = dataset.shap_values();
    let first = table.rows_in_state(state).next().ok_or_else(|| AtlasError::EmptyJoin {
        state: state.to_string(),
    })?;
    let state_code = first.1.fips.state_code();

    let domain = ValueRange::of(table.rows_in_state(state).map(|(_, r)| r.outcome));
    let joined = join(
        table.rows_in_state(state),
        |fips| boundaries.get(fips).filter(|b| b.state_code == state_code),
        |record| record.outcome,
        |row| top_features_for_record(dataset, row, top_n),
        domain,
        scale,
    );
    if joined.regions.is_empty() {
        warn!(
            state,
            state_code,
            unmatched = ?joined.unmatched,
            "No county of the state has a boundary"
        );
        return Err(AtlasError::EmptyJoin {
            state: state.to_string(),
        });
    }

    let state_boxes: Vec<Bounds> = boundaries
        .for_state(state_code)
        .filter_map(|b| b.bounds)
        .collect();
    debug!(
        state,
        state_code,
        regions = joined.regions.len(),
        "Rendered state detail map"
    );

    Ok(MapSpec {
        title: format!("{} Diagnosed Diabetes by County", state),
        legend_title: OUTCOME_COLUMN.to_string(),
        color_column: OUTCOME_COLUMN.to_string(),
        domain,
        scale: scale.clone(),
        bounds: Bounds::union_all(&state_boxes),
        regions: joined.regions,
        unmatched: joined.unmatched,
        fit_bounds: true,
    })
}
