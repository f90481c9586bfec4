//! Error taxonomy for the task service.
//!
//! # Design
//! Validation failures (`InvalidArgument`), missing rows (`NotFound`) and
//! store failures are distinct variants so the HTTP boundary can choose a
//! different status code for each. `CreationFailed` exists separately from
//! `Store` because the create path reports store trouble to the client as a
//! 400 while every other store failure surfaces as a 500.

use thiserror::Error;

/// Failures raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected a query or the connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored `created_at` value failed to parse as RFC 3339.
    #[error("task {id} has a malformed created_at timestamp")]
    MalformedTimestamp { id: i64 },

    /// An UPDATE matched no row; the task vanished between read and write.
    #[error("task {0} no longer exists")]
    RowMissing(i64),
}

/// Failures raised by the application service, matched exhaustively by the
/// HTTP boundary when choosing a status code and error label.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The caller supplied malformed or missing data. Detected before any
    /// store access is attempted.
    #[error("{0}")]
    InvalidArgument(String),

    /// No task exists with the given id.
    #[error("Task not found with id: {0}")]
    NotFound(i64),

    /// The store rejected the write while creating a task.
    #[error("Failed to create task due to database error")]
    CreationFailed(#[source] StoreError),

    /// The store failed outside the create path.
    #[error(transparent)]
    Store(#[from] StoreError),
}
