//! Maps `GrizabellaError` onto the HTTP error envelope:
//! `{"error": {"code", "category", "message", "retryable"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use grizabella::{ErrorCode, GrizabellaError};
use serde_json::json;

pub struct ApiError(pub GrizabellaError);

impl From<GrizabellaError> for ApiError {
    fn from(err: GrizabellaError) -> Self {
        ApiError(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

fn status_code(code: &ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::SchemaConflict => StatusCode::CONFLICT,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unavailable | ErrorCode::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Query => StatusCode::BAD_REQUEST,
        ErrorCode::PartialWrite | ErrorCode::Embedding | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let code = error.code();
        let status = status_code(&code);

        let mut body = json!({
            "error": {
                "code": code,
                "category": error.category(),
                "message": error.to_string(),
                "retryable": error.retryable(),
            }
        });
        if let GrizabellaError::PartialWrite { stores_diverged, repair_id } = &error {
            body["error"]["stores_diverged"] = json!(stores_diverged);
            body["error"]["repair_id"] = json!(repair_id.to_string());
        }

        (status, Json(body)).into_response()
    }
}
