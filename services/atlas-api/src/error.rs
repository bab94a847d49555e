//! HTTP error responses.

use atlas_common::{AtlasError, SelectionField};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<SelectionField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<Vec<String>>,
}

/// Handler error; wraps the library error taxonomy.
#[derive(Debug)]
pub struct ApiError(pub AtlasError);

impl From<AtlasError> for ApiError {
    fn from(err: AtlasError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if err.is_recoverable() {
            tracing::debug!(code = err.code(), "{}", err);
        } else {
            tracing::warn!(code = err.code(), "{}", err);
        }
        crate::metrics::record_error(err.code());

        let body = ErrorBody {
            code: err.code(),
            message: err.to_string(),
            field: err.field(),
            available: err.available().map(<[String]>::to_vec),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
