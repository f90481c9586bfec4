//! Task application service: input checks, business rules, shape mapping.
//!
//! # Design
//! The service holds the store and is itself held by the HTTP layer, wired
//! explicitly at startup with no container. Argument validation runs before any
//! store access; store failures on the create path are re-classified as
//! `CreationFailed` while every other store failure propagates as `Store`.
//! Completing an already-completed task is a no-op, not an error.

use tracing::{info, warn};

use crate::error::TaskError;
use crate::store::TaskStore;
use crate::types::{NewTask, TaskInput, TaskResponse};

/// Maximum number of tasks returned by [`TaskService::list_recent_open`].
pub const RECENT_OPEN_LIMIT: usize = 5;

/// Application service for the four task operations.
pub struct TaskService {
    store: TaskStore,
}

impl TaskService {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Create a task. The title must be present and non-blank; title and
    /// description are stored trimmed.
    pub async fn create(&self, input: &TaskInput) -> Result<TaskResponse, TaskError> {
        let title = required_title(input)?;
        info!(title = %title, "creating task");
        let new = NewTask {
            title,
            description: trimmed_description(input),
        };
        let task = self
            .store
            .insert(&new)
            .await
            .map_err(TaskError::CreationFailed)?;
        info!(id = task.id, "created task");
        Ok(task.into())
    }

    /// Up to [`RECENT_OPEN_LIMIT`] uncompleted tasks, most recent first. An
    /// empty list is a normal result, not an error.
    pub async fn list_recent_open(&self) -> Result<Vec<TaskResponse>, TaskError> {
        let tasks = self
            .store
            .find_open_newest_first(RECENT_OPEN_LIMIT as i64)
            .await?;
        info!(count = tasks.len(), "fetched recent uncompleted tasks");
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    /// Mark the task completed. Completing an already-completed task returns
    /// the current state unchanged.
    pub async fn complete(&self, id: i64) -> Result<TaskResponse, TaskError> {
        positive_id(id)?;
        let mut task = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;
        if task.completed {
            warn!(id, "task is already completed");
            return Ok(task.into());
        }
        task.completed = true;
        let saved = self.store.save(&task).await?;
        info!(id, "completed task");
        Ok(saved.into())
    }

    /// Overwrite title and description. `completed` and `created_at` are
    /// left untouched; a request without a description clears it.
    pub async fn update(&self, id: i64, input: &TaskInput) -> Result<TaskResponse, TaskError> {
        positive_id(id)?;
        let title = required_title(input)?;
        let mut task = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;
        task.title = title;
        task.description = trimmed_description(input);
        let saved = self.store.save(&task).await?;
        info!(id, "updated task");
        Ok(saved.into())
    }
}

fn positive_id(id: i64) -> Result<(), TaskError> {
    if id <= 0 {
        return Err(TaskError::InvalidArgument(
            "Task ID must be a positive number".to_string(),
        ));
    }
    Ok(())
}

fn required_title(input: &TaskInput) -> Result<String, TaskError> {
    match input.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(TaskError::InvalidArgument(
            "Task title cannot be null or empty".to_string(),
        )),
    }
}

fn trimmed_description(input: &TaskInput) -> Option<String> {
    input.description.as_deref().map(|d| d.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> TaskService {
        TaskService::new(TaskStore::in_memory().await.unwrap())
    }

    fn input(title: Option<&str>, description: Option<&str>) -> TaskInput {
        TaskInput {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_starts_uncompleted() {
        let service = service().await;
        let task = service
            .create(&input(Some("Test Task"), Some("Test Description")))
            .await
            .unwrap();
        assert!(task.id >= 1);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.description.as_deref(), Some("Test Description"));
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn create_trims_title_and_description() {
        let service = service().await;
        let task = service
            .create(&input(Some("  Buy milk  "), Some("  two liters ")))
            .await
            .unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description.as_deref(), Some("two liters"));
    }

    #[tokio::test]
    async fn create_rejects_missing_empty_and_blank_titles() {
        let service = service().await;
        for bad in [None, Some(""), Some("  ")] {
            let err = service.create(&input(bad, None)).await.unwrap_err();
            assert!(matches!(err, TaskError::InvalidArgument(_)), "title {bad:?}");
        }
    }

    #[tokio::test]
    async fn list_recent_open_is_empty_without_tasks() {
        let service = service().await;
        assert!(service.list_recent_open().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_recent_open_caps_at_five_newest_first() {
        let service = service().await;
        let mut ids = Vec::new();
        for n in 1..=6 {
            let task = service
                .create(&input(Some(&format!("task-{n}")), None))
                .await
                .unwrap();
            ids.push(task.id);
        }
        let recent = service.list_recent_open().await.unwrap();
        assert_eq!(recent.len(), RECENT_OPEN_LIMIT);
        let expected: Vec<i64> = ids.iter().rev().take(RECENT_OPEN_LIMIT).copied().collect();
        let got: Vec<i64> = recent.iter().map(|t| t.id).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn newly_created_task_lists_first() {
        let service = service().await;
        service.create(&input(Some("older"), None)).await.unwrap();
        let newest = service.create(&input(Some("newest"), None)).await.unwrap();
        let recent = service.list_recent_open().await.unwrap();
        assert_eq!(recent[0].id, newest.id);
    }

    #[tokio::test]
    async fn complete_flips_the_flag_once() {
        let service = service().await;
        let task = service.create(&input(Some("walk dog"), None)).await.unwrap();
        let done = service.complete(task.id).await.unwrap();
        assert!(done.completed);
        assert_eq!(done.id, task.id);
    }

    #[tokio::test]
    async fn complete_is_idempotent() {
        let service = service().await;
        let task = service.create(&input(Some("walk dog"), None)).await.unwrap();
        let first = service.complete(task.id).await.unwrap();
        let second = service.complete(task.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn complete_rejects_non_positive_ids() {
        let service = service().await;
        for bad in [0, -1] {
            let err = service.complete(bad).await.unwrap_err();
            assert!(matches!(err, TaskError::InvalidArgument(_)), "id {bad}");
        }
    }

    #[tokio::test]
    async fn complete_unknown_id_is_not_found() {
        let service = service().await;
        let err = service.complete(999_999).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(999_999)));
    }

    #[tokio::test]
    async fn completed_task_leaves_the_recent_list() {
        let service = service().await;
        let task = service.create(&input(Some("done soon"), None)).await.unwrap();
        service.complete(task.id).await.unwrap();
        assert!(service.list_recent_open().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_title_and_description() {
        let service = service().await;
        let task = service
            .create(&input(Some("before"), Some("old")))
            .await
            .unwrap();
        let updated = service
            .update(task.id, &input(Some("  after  "), Some(" new ")))
            .await
            .unwrap();
        assert_eq!(updated.title, "after");
        assert_eq!(updated.description.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn update_clears_description_when_absent() {
        let service = service().await;
        let task = service
            .create(&input(Some("keep title"), Some("to be removed")))
            .await
            .unwrap();
        let updated = service
            .update(task.id, &input(Some("keep title"), None))
            .await
            .unwrap();
        assert!(updated.description.is_none());
    }

    #[tokio::test]
    async fn update_never_changes_id_created_at_or_completed() {
        let service = service().await;
        let task = service.create(&input(Some("stable"), None)).await.unwrap();
        let done = service.complete(task.id).await.unwrap();
        let updated = service
            .update(task.id, &input(Some("renamed"), None))
            .await
            .unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.completed, done.completed);
    }

    #[tokio::test]
    async fn update_rejects_bad_arguments() {
        let service = service().await;
        let err = service.update(0, &input(Some("x"), None)).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidArgument(_)));
        let task = service.create(&input(Some("present"), None)).await.unwrap();
        let err = service.update(task.id, &input(Some(" "), None)).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let service = service().await;
        let err = service
            .update(424_242, &input(Some("nope"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::NotFound(424_242)));
    }
}
