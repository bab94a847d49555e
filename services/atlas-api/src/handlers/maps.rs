//! Choropleth map handlers.
//!
//! Each handler resolves a selection from its query parameters, renders the
//! map against the shared boundary collection and serializes it together
//! with the numbers shown next to the map.

use std::sync::Arc;

use atlas_common::{AtlasError, AtlasResult, SelectionField, Year};
use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Response},
    Json,
};
use choropleth::{render, render_raw, render_state_detail, MapSpec};
use ranking::{top_features_for_county, top_values_by_column, ColumnMax, ValueRange};
use selection::{Picks, Selection, SelectionResolver};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

/// Query parameters for the national maps.
#[derive(Debug, Deserialize, Default)]
pub struct MapParams {
    pub year: Option<String>,
    pub factor: Option<String>,
}

/// Query parameters for the state drill-down.
#[derive(Debug, Deserialize, Default)]
pub struct StateMapParams {
    pub year: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,

    /// Number of top features per county; defaults to the configured value.
    pub n: Option<usize>,
}

#[derive(Serialize)]
pub struct MapResponse<'a> {
    pub year: &'a Year,
    pub factor: &'a str,
    pub range: Option<ValueRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<ColumnMax>>,
    pub map: MapSpec<'a>,
}

#[derive(Serialize)]
pub struct StateMapResponse<'a> {
    pub selection: &'a Selection,
    pub top_features: Vec<String>,
    pub map: MapSpec<'a>,
}

fn resolve_factor(state: &AppState, params: MapParams) -> AtlasResult<Selection> {
    SelectionResolver::new(&state.registry).resolve(&Picks {
        year: params.year,
        factor: params.factor,
        ..Picks::default()
    })
}

// Empty only for a year without rows or feature columns.
fn required(field: SelectionField, value: Option<&str>) -> AtlasResult<&str> {
    value.ok_or_else(|| AtlasError::invalid(field, "", Vec::new()))
}

/// GET /api/map?year=&factor=
///
/// Attribution map with the year's factor ranking and value range.
pub async fn map_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<MapParams>,
) -> ApiResult<Response> {
    let _timer = RequestTimer::start("map");
    let selection = resolve_factor(&state, params)?;
    let dataset = state.registry.get(selection.year().as_str())?;
    let table = dataset.shap_values();
    let factor = required(SelectionField::Factor, selection.factor())?;

    let map = render(table, factor, &state.boundaries, &state.config.color_scale)?;
    let response = MapResponse {
        year: dataset.year(),
        factor,
        range: map.domain,
        ranking: Some(top_values_by_column(table)),
        map,
    };
    Ok(Json(response).into_response())
}

/// GET /api/raw-map?year=&factor=
///
/// Raw-value map of the selected factor, scaled by that column's range.
pub async fn raw_map_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<MapParams>,
) -> ApiResult<Response> {
    let _timer = RequestTimer::start("raw_map");
    let selection = resolve_factor(&state, params)?;
    let dataset = state.registry.get(selection.year().as_str())?;
    let table = dataset.processed_data();
    let factor = required(SelectionField::Factor, selection.factor())?;

    let map = render_raw(table, factor, &state.boundaries, &state.config.color_scale)?;
    let response = MapResponse {
        year: dataset.year(),
        factor,
        range: map.domain,
        ranking: None,
        map,
    };
    Ok(Json(response).into_response())
}

/// GET /api/state-map?year=&state=&county=&n=
///
/// Prevalence map of one state plus the selected county's top features.
pub async fn state_map_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<StateMapParams>,
) -> ApiResult<Response> {
    let _timer = RequestTimer::start("state_map");
    let n = params.n.unwrap_or(state.config.top_features);

    let selection = SelectionResolver::new(&state.registry).resolve(&Picks {
        year: params.year,
        factor: None,
        state: params.state,
        county: params.county,
    })?;
    let dataset = state.registry.get(selection.year().as_str())?;
    let us_state = required(SelectionField::State, selection.state())?;
    let county = required(SelectionField::County, selection.county())?;

    let map = render_state_detail(
        dataset,
        us_state,
        &state.boundaries,
        &state.config.color_scale,
        n,
    )?;
    let top_features = top_features_for_county(dataset, us_state, county, n)?;

    let response = StateMapResponse {
        selection: &selection,
        top_features,
        map,
    };
    Ok(Json(response).into_response())
}
