//! Selection resolution handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use selection::{Picks, Selection, SelectionResolver};

use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

/// GET /api/selection?year=&factor=&state=&county=
///
/// Resolves the given picks into a full selection. Omitted fields take their
/// defaults; a pick outside its domain is rejected with the valid values.
pub async fn selection_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(picks): Query<Picks>,
) -> ApiResult<Json<Selection>> {
    let _timer = RequestTimer::start("selection");
    let selection = SelectionResolver::new(&state.registry).resolve(&picks)?;
    Ok(Json(selection))
}
