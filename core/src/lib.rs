//! Task-tracking domain core: records, store, and application service.
//!
//! # Overview
//! The store owns durable task records in SQLite and the row ↔ record
//! mapping; the service enforces the business rules (required titles,
//! positive ids, idempotent completion, the five-task recency window) and
//! maps records to wire shapes. The HTTP crate holds a `TaskService`, the
//! service holds a `TaskStore`, and both are wired explicitly at startup.
//!
//! # Design
//! - Every failure is a typed variant of [`TaskError`] or [`StoreError`] so
//!   the boundary layer can match exhaustively when picking status codes.
//! - Validation runs before any store access; no operation retries.

pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use error::{StoreError, TaskError};
pub use service::{TaskService, RECENT_OPEN_LIMIT};
pub use store::TaskStore;
pub use types::{NewTask, Task, TaskInput, TaskResponse};
