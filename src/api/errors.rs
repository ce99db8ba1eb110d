#[cfg(feature = "ssr")]
use crate::error::AppError;
#[cfg(feature = "ssr")]
use axum::http::StatusCode;
#[cfg(feature = "ssr")]
use axum::response::{IntoResponse, Response};

/// Message returned for every server-side failure. The detail stays in the logs.
pub const GENERIC_FAILURE_MESSAGE: &str = "Upload failed. Please try again later.";

/// Converts AppError into the `{ success: false, error }` JSON body.
#[cfg(feature = "ssr")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_client_error() {
            tracing::debug!(error = %self, "Rejected request");
            (StatusCode::BAD_REQUEST, self.to_string())
        } else {
            tracing::error!(error = %self, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_FAILURE_MESSAGE.to_string(),
            )
        };

        let body = serde_json::json!({
            "success": false,
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}
