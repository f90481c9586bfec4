//! HTTP endpoint layer for the task-tracking API.
//!
//! # Overview
//! Four routes map one-to-one onto the application service operations:
//!
//! ```text
//! POST /api/tasks                create          201
//! GET  /api/tasks/recent         list_recent_open 200
//! PUT  /api/tasks/{id}/complete  complete         200
//! PUT  /api/tasks/{id}           update           200
//! ```
//!
//! Request bodies are validated here before the service is invoked; every
//! failure renders through [`error::ApiFailure`] as a structured body. The
//! router is built by [`app`] so integration tests can drive it through
//! `tower::ServiceExt::oneshot` without binding a socket.

pub mod error;

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use tasktrack_core::{TaskInput, TaskResponse, TaskService};

use crate::error::ApiFailure;

/// Longest accepted title, counted in characters after trimming.
pub const MAX_TITLE_CHARS: usize = 255;

/// Origin of the browser frontend during development.
const FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Build the router. The service is wired in explicitly; handlers reach it
/// through [`State`].
pub fn app(service: TaskService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static(FRONTEND_ORIGIN))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);
    Router::new()
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/recent", get(recent_tasks))
        .route("/api/tasks/{id}/complete", put(complete_task))
        .route("/api/tasks/{id}", put(update_task))
        .layer(cors)
        .with_state(Arc::new(service))
}

/// Serve the API on `listener` until the process exits.
pub async fn run(listener: TcpListener, service: TaskService) -> Result<(), std::io::Error> {
    axum::serve(listener, app(service)).await
}

async fn create_task(
    State(service): State<Arc<TaskService>>,
    uri: Uri,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiFailure> {
    let path = uri.path();
    let Json(input) = body.map_err(|r| ApiFailure::from_body_rejection(path, &r))?;
    info!("received request to create task: {:?}", input.title);
    validate_input(path, &input)?;
    let response = service
        .create(&input)
        .await
        .map_err(|err| ApiFailure::from_task_error(path, err))?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn recent_tasks(
    State(service): State<Arc<TaskService>>,
    uri: Uri,
) -> Result<Json<Vec<TaskResponse>>, ApiFailure> {
    info!("received request to get recent tasks");
    let tasks = service
        .list_recent_open()
        .await
        .map_err(|err| ApiFailure::from_task_error(uri.path(), err))?;
    Ok(Json(tasks))
}

async fn complete_task(
    State(service): State<Arc<TaskService>>,
    uri: Uri,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TaskResponse>, ApiFailure> {
    let path = uri.path();
    let Path(id) = id.map_err(|r| ApiFailure::from_path_rejection(path, &r))?;
    info!(id, "received request to complete task");
    let response = service
        .complete(id)
        .await
        .map_err(|err| ApiFailure::from_task_error(path, err))?;
    Ok(Json(response))
}

async fn update_task(
    State(service): State<Arc<TaskService>>,
    uri: Uri,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiFailure> {
    let path = uri.path();
    let Path(id) = id.map_err(|r| ApiFailure::from_path_rejection(path, &r))?;
    let Json(input) = body.map_err(|r| ApiFailure::from_body_rejection(path, &r))?;
    info!(id, "received request to update task");
    validate_input(path, &input)?;
    let response = service
        .update(id, &input)
        .await
        .map_err(|err| ApiFailure::from_task_error(path, err))?;
    Ok(Json(response))
}

/// Endpoint-layer validation of the request body, run before the service is
/// invoked. A failure short-circuits with the 400 "Validation Failed" row.
fn validate_input(path: &str, input: &TaskInput) -> Result<(), ApiFailure> {
    let mut errors: Vec<(&str, &str)> = Vec::new();
    match input.title.as_deref().map(str::trim) {
        None | Some("") => errors.push(("title", "Title is required")),
        Some(title) if title.chars().count() > MAX_TITLE_CHARS => {
            errors.push(("title", "Title must not exceed 255 characters"));
        }
        Some(_) => {}
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiFailure::validation(path, &errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: Option<&str>) -> TaskInput {
        TaskInput {
            title: title.map(str::to_string),
            description: None,
        }
    }

    #[test]
    fn validate_accepts_a_plain_title() {
        assert!(validate_input("/api/tasks", &input(Some("Buy milk"))).is_ok());
    }

    #[test]
    fn validate_accepts_a_title_of_exactly_255_chars() {
        let title = "x".repeat(MAX_TITLE_CHARS);
        assert!(validate_input("/api/tasks", &input(Some(&title))).is_ok());
    }

    #[test]
    fn validate_rejects_a_title_over_255_chars() {
        let title = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(validate_input("/api/tasks", &input(Some(&title))).is_err());
    }

    #[test]
    fn validate_counts_length_after_trimming() {
        let title = format!("  {}  ", "x".repeat(MAX_TITLE_CHARS));
        assert!(validate_input("/api/tasks", &input(Some(&title))).is_ok());
    }

    #[test]
    fn validate_rejects_missing_empty_and_blank_titles() {
        for bad in [None, Some(""), Some("   ")] {
            assert!(validate_input("/api/tasks", &input(bad)).is_err(), "title {bad:?}");
        }
    }
}
