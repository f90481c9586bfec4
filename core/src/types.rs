//! Domain records and transport shapes for the task API.
//!
//! # Design
//! `Task` is the stored record and never crosses the HTTP boundary directly;
//! `TaskInput` and `TaskResponse` are the wire shapes. `TaskInput.title` is
//! optional so that an absent title reaches the validators as `None` instead
//! of failing JSON deserialization; both the endpoint validator and the
//! service report it through their own structured failure paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored task record. `id` and `created_at` are assigned by the store on
/// insert and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

/// Data for a task that does not exist yet. The store assigns the id and
/// creation timestamp on insert.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// Request payload for the create and update operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            created_at: task.created_at,
            completed: task.completed,
        }
    }
}
