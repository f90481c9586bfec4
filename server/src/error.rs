//! Maps service failures and request rejections to structured error bodies.
//!
//! # Design
//! Every failure kind has exactly one row here: [`ApiFailure::from_task_error`]
//! matches `TaskError` exhaustively, field validation and body/path rejections
//! get their own constructors, and a body rejection that is not a client
//! mistake falls through to the generic 500 row. Store causes are logged and
//! never leak into the response body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use tasktrack_core::TaskError;

/// Wire shape shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub status: u16,
    pub timestamp: String,
    pub path: String,
}

/// A failure ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    label: &'static str,
    message: String,
    path: String,
}

impl ApiFailure {
    fn new(status: StatusCode, label: &'static str, message: String, path: &str) -> Self {
        Self {
            status,
            label,
            message,
            path: path.to_string(),
        }
    }

    /// Total mapping from service failures to HTTP rows.
    pub fn from_task_error(path: &str, err: TaskError) -> Self {
        match err {
            TaskError::NotFound(_) => {
                error!("task not found: {err}");
                Self::new(StatusCode::NOT_FOUND, "Task Not Found", err.to_string(), path)
            }
            TaskError::InvalidArgument(message) => {
                error!("invalid argument: {message}");
                Self::new(StatusCode::BAD_REQUEST, "Invalid Argument", message, path)
            }
            TaskError::CreationFailed(source) => {
                error!("task creation failed: {source}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "Task Creation Failed",
                    "Failed to create task due to database error".to_string(),
                    path,
                )
            }
            TaskError::Store(source) => {
                error!("database error: {source}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    path,
                )
            }
        }
    }

    /// Field-validation failure raised by the endpoint layer before the
    /// service is invoked.
    pub fn validation(path: &str, errors: &[(&str, &str)]) -> Self {
        let fields = errors
            .iter()
            .map(|(field, message)| format!("{field}={message}"))
            .collect::<Vec<_>>()
            .join(", ");
        error!("validation failed: {{{fields}}}");
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation Failed",
            format!("Invalid input data: {{{fields}}}"),
            path,
        )
    }

    /// Rejection raised while deserializing a request body. Client mistakes
    /// map to the validation row; anything else is the generic 500.
    pub fn from_body_rejection(path: &str, rejection: &JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => {
                error!("request body rejected: {}", rejection.body_text());
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "Validation Failed",
                    format!("Invalid input data: {}", rejection.body_text()),
                    path,
                )
            }
            _ => {
                error!("unexpected error reading request body: {}", rejection.body_text());
                Self::internal(path)
            }
        }
    }

    /// Rejection raised while parsing the `{id}` path segment.
    pub fn from_path_rejection(path: &str, rejection: &PathRejection) -> Self {
        error!("path parameter rejected: {}", rejection.body_text());
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation Failed",
            format!("Invalid input data: {}", rejection.body_text()),
            path,
        )
    }

    /// Fallback row for failures with no classification of their own.
    fn internal(path: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "An unexpected error occurred. Please try again later.".to_string(),
            path,
        )
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.label.to_string(),
            message: self.message,
            status: self.status.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
            path: self.path,
        };
        (self.status, Json(body)).into_response()
    }
}
