//! Error handler for converting AppError to HTTP responses.
//!
//! Every error body is an [`ErrorResponse`]. The request ID of the request
//! being served is attached when one is in scope.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use super::request_id::current_request_id;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate → 500 INTERNAL_SERVER_ERROR (code `DUPLICATE_ENTRY`)
    /// - Validation → 400 BAD_REQUEST
    /// - Database, ConnectionPool, Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        if status.is_server_error() {
            error!(error = ?self, "Request failed");
        }

        let error_response = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
            AppError::Database { operation, .. } => ErrorResponse::new(
                "DATABASE_ERROR",
                &format!("Database operation failed: {}", operation),
            )
            .with_details(json!({ "operation": operation })),
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("DATABASE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        error_body(status, error_response)
    }
}

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::Duplicate { .. }
        | AppError::Database { .. }
        | AppError::ConnectionPool { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Converts axum JSON rejection errors to ErrorResponse.
pub fn handle_json_rejection(rejection: JsonRejection) -> Response {
    let (status, error_response) = match rejection {
        JsonRejection::JsonDataError(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse::new("INVALID_JSON", "Request body does not match the expected shape")
                .with_details(json!({ "error": err.body_text() })),
        ),
        JsonRejection::JsonSyntaxError(err) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JSON_SYNTAX_ERROR", "JSON syntax error")
                .with_details(json!({ "error": err.body_text() })),
        ),
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorResponse::new(
                "MISSING_CONTENT_TYPE",
                "Missing or invalid Content-Type header",
            )
            .with_details(json!({ "expected": "application/json" })),
        ),
        JsonRejection::BytesRejection(_) => (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorResponse::new("REQUEST_TOO_LARGE", "Request body too large"),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JSON_ERROR", "Failed to parse JSON request"),
        ),
    };

    error_body(status, error_response)
}

/// Converts axum path rejection errors to ErrorResponse.
pub fn handle_path_rejection(rejection: PathRejection) -> Response {
    let error_response = match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            ErrorResponse::new("INVALID_PATH_PARAMS", "Invalid path parameters")
                .with_details(json!({ "error": err.body_text() }))
        }
        PathRejection::MissingPathParams(err) => {
            ErrorResponse::new("MISSING_PATH_PARAMS", "Missing required path parameters")
                .with_details(json!({ "error": err.body_text() }))
        }
        _ => ErrorResponse::new("PATH_ERROR", "Invalid path parameters"),
    };

    error_body(StatusCode::BAD_REQUEST, error_response)
}

fn error_body(status: StatusCode, error_response: ErrorResponse) -> Response {
    let error_response = match current_request_id() {
        Some(request_id) => error_response.with_request_id(&request_id),
        None => error_response,
    };

    (status, Json(error_response)).into_response()
}
