use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::ValidationErrors;
use database::DbError;
use serde_json::json;
use thiserror::Error;

pub const CONNECTION_FAILED: &str = "Database connection failed";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid payload: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Unreadable request body: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database connection error: {0}")]
    Connection(#[source] DbError),
    #[error("Database error: {0}")]
    Database(#[source] DbError),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        if err.is_connection_failure() {
            AppError::Connection(err)
        } else {
            AppError::Database(err)
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Store failures are logged here and replaced by a generic message; the
/// underlying error never reaches the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(errors) => {
                tracing::debug!(fields = %errors, "Payload rejected by schema.");
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Connection(db_err) => {
                tracing::error!(error = ?db_err, "Database connection failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CONNECTION_FAILED.to_string(),
                )
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER_ERROR.to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
