//! SQLite-backed task record store.
//!
//! # Design
//! The store owns the row ↔ record mapping: rows keep `created_at` as
//! fixed-width RFC 3339 TEXT (microsecond precision, `Z` offset) so that
//! lexicographic ordering in SQL matches chronological ordering, while
//! records carry a parsed `DateTime<Utc>`. The "recent open" query carries
//! its LIMIT in SQL, so callers never receive more rows than they asked for,
//! and breaks `created_at` ties with `id DESC`, so insertion order wins
//! within one timestamp granule. `save` leaves `created_at` out of its column list;
//! the creation timestamp cannot change through this store.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::StoreError;
use crate::types::{NewTask, Task};

/// Row shape of the `tasks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: Option<String>,
    created_at: String,
    completed: bool,
}

fn encode_created_at(created_at: DateTime<Utc>) -> String {
    created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn record_from_row(row: TaskRow) -> Result<Task, StoreError> {
    let created_at = DateTime::parse_from_rfc3339(&row.created_at)
        .map_err(|_| StoreError::MalformedTimestamp { id: row.id })?
        .with_timezone(&Utc);
    Ok(Task {
        id: row.id,
        title: row.title,
        description: row.description,
        created_at,
        completed: row.completed,
    })
}

/// Persistent store for task records.
///
/// Cheap to clone; the pool is reference-counted.
#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    /// Open the database at `url` (creating the file if missing) and ensure
    /// the `tasks` table exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::from)?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opts).await?;
        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    /// Single-connection in-memory database for tests. One connection is
    /// mandatory: every SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:").map_err(StoreError::from)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> Result<(), StoreError> {
        // AUTOINCREMENT keeps ids from ever being reused.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL,
                 description TEXT,
                 created_at TEXT NOT NULL,
                 completed INTEGER NOT NULL DEFAULT 0
             )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a new task. The store assigns the id and `created_at` and the
    /// task starts uncompleted.
    pub async fn insert(&self, new: &NewTask) -> Result<Task, StoreError> {
        // Truncated to the stored precision so the returned record is
        // identical to what a later read produces.
        let created_at = Utc::now().trunc_subsecs(6);
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, created_at, completed)
             VALUES (?, ?, ?, 0)",
        )
        .bind(&new.title)
        .bind(new.description.as_deref())
        .bind(encode_created_at(created_at))
        .execute(&self.pool)
        .await?;
        Ok(Task {
            id: result.last_insert_rowid(),
            title: new.title.clone(),
            description: new.description.clone(),
            created_at,
            completed: false,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(record_from_row).transpose()
    }

    /// The `limit` most recently created uncompleted tasks, newest first.
    pub async fn find_open_newest_first(&self, limit: i64) -> Result<Vec<Task>, StoreError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT * FROM tasks WHERE completed = 0
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(record_from_row).collect()
    }

    /// Persist `title`, `description` and `completed` for an existing task.
    pub async fn save(&self, task: &Task) -> Result<Task, StoreError> {
        let result = sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, completed = ? WHERE id = ?",
        )
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.completed)
        .bind(task.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::RowMissing(task.id));
        }
        Ok(task.clone())
    }
}
