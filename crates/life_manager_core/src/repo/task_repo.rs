//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete over the `tasks` table.
//!
//! # Invariants
//! - `create` assigns the generated id onto the returned record.
//! - `update` never touches `user_id` or `created_at`.
//! - `get_all` returns the owner's rows in storage order (`id ASC`).

use crate::model::task::{Task, TaskStatus};
use crate::model::{format_timestamp, TaskId, UserId};
use crate::repo::{created_at_column, expect_changed, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    status,
    priority,
    color,
    created_at
FROM tasks";

/// Repository interface for task CRUD.
pub trait TaskRepository {
    /// Inserts `task` and returns it with its assigned id.
    fn create(&self, task: Task) -> RepoResult<Task>;
    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// All tasks of one owner, unfiltered, in storage order.
    fn get_all(&self, user_id: UserId) -> RepoResult<Vec<Task>>;
    /// Overwrites the mutable fields of an existing task.
    fn update(&self, task: &Task) -> RepoResult<()>;
    fn delete(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
///
/// Accepts a plain connection or a `Transaction` (via deref).
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create(&self, mut task: Task) -> RepoResult<Task> {
        self.conn.execute(
            "INSERT INTO tasks (
                user_id,
                title,
                description,
                status,
                priority,
                color,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.user_id,
                task.title.as_str(),
                task.description.as_deref(),
                task.status.as_str(),
                task.priority,
                task.color.as_deref(),
                format_timestamp(&task.created_at),
            ],
        )?;

        task.id = Some(self.conn.last_insert_rowid());
        Ok(task)
    }

    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self, user_id: UserId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([user_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn update(&self, task: &Task) -> RepoResult<()> {
        let id = task.id.ok_or(RepoError::MissingId("task"))?;
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                status = ?3,
                priority = ?4,
                color = ?5
             WHERE id = ?6;",
            params![
                task.title.as_str(),
                task.description.as_deref(),
                task.status.as_str(),
                task.priority,
                task.color.as_deref(),
                id,
            ],
        )?;
        expect_changed(changed, "task", id)
    }

    fn delete(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        expect_changed(changed, "task", id)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    Ok(Task {
        id: Some(row.get("id")?),
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority: row.get("priority")?,
        color: row.get("color")?,
        created_at: created_at_column(row, "tasks")?,
    })
}
