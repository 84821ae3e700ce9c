//! Task use-case service.
//!
//! # Responsibility
//! - Create tasks through a creation preset and persist them.
//! - List one owner's tasks with status filter, title search and sorting.
//! - Apply field updates as atomic read-modify-write units of work.
//! - Derive completion statistics and the calendar day grouping.
//!
//! # Invariants
//! - Filtering happens in memory after loading the owner's full list, in
//!   the order: status, title search, sort.
//! - Sorting is stable in both directions; equal keys keep storage order.
//! - Priority updates stay within `PRIORITY_MIN..=PRIORITY_MAX`.

use crate::db::{DbError, Database};
use crate::model::task::{Task, TaskStatus, PRIORITY_MAX, PRIORITY_MIN};
use crate::model::task_preset::{TaskPreset, UnknownTaskPreset};
use crate::model::{TaskId, UserId};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoError;
use chrono::Datelike;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

#[derive(Debug)]
pub enum TaskServiceError {
    /// Creation preset tag is not one of `simple|urgent`.
    UnknownPreset(UnknownTaskPreset),
    EmptyTitle,
    PriorityOutOfRange(i64),
    /// Color is not a `#rrggbb` value.
    InvalidColor(String),
    InvalidMonth(u32),
    TaskNotFound(TaskId),
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPreset(err) => write!(f, "{err}"),
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::PriorityOutOfRange(value) => write!(
                f,
                "priority {value} is out of range {PRIORITY_MIN}..={PRIORITY_MAX}"
            ),
            Self::InvalidColor(value) => write!(f, "invalid color `{value}`; expected #rrggbb"),
            Self::InvalidMonth(value) => write!(f, "invalid month {value}; expected 1..=12"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownPreset(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for TaskServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(value.into())
    }
}

impl From<UnknownTaskPreset> for TaskServiceError {
    fn from(value: UnknownTaskPreset) -> Self {
        Self::UnknownPreset(value)
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Field used to order task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Priority,
    CreatedAt,
}

impl SortField {
    /// Parses `priority|created_at`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "priority" => Some(Self::Priority),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses `asc|desc`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Listing options for [`TaskService::get_user_tasks`].
///
/// The default lists everything by priority, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Exact status match.
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

/// Completion counters for one owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStatistics {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    /// Percentage of completed tasks, `0.0` without tasks.
    pub completion_rate: f64,
}

pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates a task from a preset tag (`simple|urgent`).
    pub fn create_task(
        &self,
        user_id: UserId,
        title: &str,
        description: Option<String>,
        preset_tag: &str,
    ) -> TaskServiceResult<Task> {
        let preset = TaskPreset::from_tag(preset_tag)?;
        self.create_task_with_preset(user_id, title, description, preset)
    }

    pub fn create_task_with_preset(
        &self,
        user_id: UserId,
        title: &str,
        description: Option<String>,
        preset: TaskPreset,
    ) -> TaskServiceResult<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskServiceError::EmptyTitle);
        }

        let task = preset.build(user_id, title, description);
        let created = self
            .db
            .unit_of_work(|tx| SqliteTaskRepository::new(tx).create(task))
            .map_err(TaskServiceError::from)
            .inspect_err(|err| {
                warn!("event=task_create module=service status=error user_id={user_id} error={err}")
            })?;
        info!(
            "event=task_create module=service status=ok user_id={} task_id={} preset={}",
            user_id,
            created.id.unwrap_or_default(),
            preset.as_str()
        );
        Ok(created)
    }

    pub fn get_task(&self, id: TaskId) -> TaskServiceResult<Option<Task>> {
        self.db
            .unit_of_work(|tx| SqliteTaskRepository::new(tx).get_by_id(id))
            .map_err(TaskServiceError::from)
    }

    /// Lists the owner's tasks filtered and ordered by `query`.
    pub fn get_user_tasks(
        &self,
        user_id: UserId,
        query: &TaskQuery,
    ) -> TaskServiceResult<Vec<Task>> {
        let tasks = self.load_user_tasks(user_id)?;
        Ok(filter_and_sort(tasks, query))
    }

    pub fn update_task_status(&self, id: TaskId, status: TaskStatus) -> TaskServiceResult<Task> {
        self.modify_task(id, |task| {
            task.status = status;
            Ok(())
        })
    }

    pub fn update_task_priority(&self, id: TaskId, priority: i64) -> TaskServiceResult<Task> {
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
            return Err(TaskServiceError::PriorityOutOfRange(priority));
        }
        self.modify_task(id, |task| {
            task.priority = priority;
            Ok(())
        })
    }

    /// Sets or clears the color tag. Stored lowercase.
    pub fn update_task_color(&self, id: TaskId, color: Option<&str>) -> TaskServiceResult<Task> {
        let color = normalize_color(color)?;
        self.modify_task(id, |task| {
            task.color = color;
            Ok(())
        })
    }

    pub fn update_task_description(
        &self,
        id: TaskId,
        description: Option<String>,
    ) -> TaskServiceResult<Task> {
        self.modify_task(id, |task| {
            task.description = description;
            Ok(())
        })
    }

    pub fn delete_task(&self, id: TaskId) -> TaskServiceResult<()> {
        self.db
            .unit_of_work(|tx| SqliteTaskRepository::new(tx).delete(id))
            .map_err(TaskServiceError::from)
            .inspect_err(|err| {
                warn!("event=task_delete module=service status=error task_id={id} error={err}")
            })
    }

    pub fn get_task_statistics(&self, user_id: UserId) -> TaskServiceResult<TaskStatistics> {
        let tasks = self.get_user_tasks(user_id, &TaskQuery::default())?;
        Ok(compute_statistics(&tasks))
    }

    /// Groups the owner's open tasks by creation day within one month.
    ///
    /// Completed tasks are left out. Keys are days of month; each list
    /// keeps storage order.
    pub fn tasks_by_day(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> TaskServiceResult<BTreeMap<u32, Vec<Task>>> {
        if !(1..=12).contains(&month) {
            return Err(TaskServiceError::InvalidMonth(month));
        }
        Ok(open_tasks_by_day(self.load_user_tasks(user_id)?, year, month))
    }

    fn load_user_tasks(&self, user_id: UserId) -> TaskServiceResult<Vec<Task>> {
        self.db
            .unit_of_work(|tx| SqliteTaskRepository::new(tx).get_all(user_id))
            .map_err(TaskServiceError::from)
    }

    /// Fetch, mutate and persist one task inside a single transaction.
    fn modify_task(
        &self,
        id: TaskId,
        mutate: impl FnOnce(&mut Task) -> TaskServiceResult<()>,
    ) -> TaskServiceResult<Task> {
        self.db.unit_of_work(|tx| {
            let repo = SqliteTaskRepository::new(tx);
            let mut task = repo
                .get_by_id(id)?
                .ok_or(TaskServiceError::TaskNotFound(id))?;
            mutate(&mut task)?;
            repo.update(&task)?;
            Ok(task)
        })
    }
}

/// Applies status filter, title search and stable sort, in that order.
pub fn filter_and_sort(tasks: Vec<Task>, query: &TaskQuery) -> Vec<Task> {
    let needle = query.search.as_deref().map(str::to_lowercase);
    let mut tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|task| query.status.map_or(true, |status| task.status == status))
        .filter(|task| {
            needle
                .as_deref()
                .map_or(true, |needle| task.title.to_lowercase().contains(needle))
        })
        .collect();

    tasks.sort_by(|left, right| {
        let ordering = match query.sort_by {
            SortField::Priority => left.priority.cmp(&right.priority),
            SortField::CreatedAt => left.created_at.cmp(&right.created_at),
        };
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    tasks
}

/// Buckets non-completed tasks created in `year`/`month` by day of month.
pub fn open_tasks_by_day(tasks: Vec<Task>, year: i32, month: u32) -> BTreeMap<u32, Vec<Task>> {
    let mut days: BTreeMap<u32, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        let date = task.created_at.date();
        if task.status != TaskStatus::Completed && date.year() == year && date.month() == month {
            days.entry(date.day()).or_default().push(task);
        }
    }
    days
}

/// Counts completed and in-progress tasks.
pub fn compute_statistics(tasks: &[Task]) -> TaskStatistics {
    let total = tasks.len();
    let completed = count_status(tasks, TaskStatus::Completed);
    let in_progress = count_status(tasks, TaskStatus::InProgress);
    let completion_rate = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    };

    TaskStatistics {
        total,
        completed,
        in_progress,
        completion_rate,
    }
}

fn count_status(tasks: &[Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|task| task.status == status).count()
}

fn normalize_color(color: Option<&str>) -> TaskServiceResult<Option<String>> {
    match color.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if COLOR_RE.is_match(value) => Ok(Some(value.to_ascii_lowercase())),
        Some(value) => Err(TaskServiceError::InvalidColor(value.to_string())),
    }
}
