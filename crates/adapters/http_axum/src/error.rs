//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use dashdeck_domain::error::DashError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`DashError`] to an HTTP response with appropriate status code.
pub struct ApiError(DashError);

impl From<DashError> for ApiError {
    fn from(err: DashError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DashError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            DashError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            DashError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
