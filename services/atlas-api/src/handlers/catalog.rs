//! Year, factor and location listings.
//!
//! These back the pickers of a front end: each response lists the valid
//! values for one field, in the order they should be offered.

use std::sync::Arc;

use atlas_common::Year;
use axum::{
    extract::{Extension, Path},
    Json,
};
use ranking::{top_values_by_column, value_range, ColumnMax, ValueRange};
use serde::Serialize;

use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct YearsResponse {
    pub years: Vec<Year>,
    pub default: Year,
}

#[derive(Debug, Serialize)]
pub struct FactorsResponse {
    pub year: Year,
    pub factors: Vec<ColumnMax>,
}

#[derive(Debug, Serialize)]
pub struct RangeResponse {
    pub year: Year,
    pub range: Option<ValueRange>,
}

#[derive(Debug, Serialize)]
pub struct StatesResponse {
    pub year: Year,
    pub states: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CountiesResponse {
    pub year: Year,
    pub state: String,
    pub counties: Vec<String>,
}

/// GET /api/years
pub async fn years_handler(Extension(state): Extension<Arc<AppState>>) -> Json<YearsResponse> {
    let _timer = RequestTimer::start("years");
    Json(YearsResponse {
        years: state.registry.years(),
        default: state.registry.default_year().clone(),
    })
}

/// GET /api/years/:year/factors
///
/// Attribution factors with their column maxima, highest first.
pub async fn factors_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(year): Path<String>,
) -> ApiResult<Json<FactorsResponse>> {
    let _timer = RequestTimer::start("factors");
    let dataset = state.registry.get(&year)?;
    Ok(Json(FactorsResponse {
        year: dataset.year().clone(),
        factors: top_values_by_column(dataset.shap_values()),
    }))
}

/// GET /api/years/:year/raw-factors
pub async fn raw_factors_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(year): Path<String>,
) -> ApiResult<Json<FactorsResponse>> {
    let _timer = RequestTimer::start("raw_factors");
    let dataset = state.registry.get(&year)?;
    Ok(Json(FactorsResponse {
        year: dataset.year().clone(),
        factors: top_values_by_column(dataset.processed_data()),
    }))
}

/// GET /api/years/:year/range
pub async fn range_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(year): Path<String>,
) -> ApiResult<Json<RangeResponse>> {
    let _timer = RequestTimer::start("range");
    let dataset = state.registry.get(&year)?;
    Ok(Json(RangeResponse {
        year: dataset.year().clone(),
        range: value_range(dataset.shap_values()),
    }))
}

/// GET /api/years/:year/states
pub async fn states_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(year): Path<String>,
) -> ApiResult<Json<StatesResponse>> {
    let _timer = RequestTimer::start("states");
    let dataset = state.registry.get(&year)?;
    Ok(Json(StatesResponse {
        year: dataset.year().clone(),
        states: selection::available_states(dataset),
    }))
}

/// GET /api/years/:year/states/:state/counties
pub async fn counties_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((year, us_state)): Path<(String, String)>,
) -> ApiResult<Json<CountiesResponse>> {
    let _timer = RequestTimer::start("counties");
    let dataset = state.registry.get(&year)?;
    let counties = selection::available_counties(dataset, &us_state)?;
    Ok(Json(CountiesResponse {
        year: dataset.year().clone(),
        state: us_state,
        counties,
    }))
}
