//! Task record and lifecycle status.
//!
//! # Invariants
//! - `priority` is bounded to `PRIORITY_MIN..=PRIORITY_MAX` by the task
//!   service; storage accepts any integer.
//! - `color`, when set, is a `#rrggbb` tag.

use crate::model::{TaskId, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lowest priority accepted by task updates.
pub const PRIORITY_MIN: i64 = 0;
/// Highest priority accepted by task updates.
pub const PRIORITY_MAX: i64 = 3;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, not started.
    New,
    InProgress,
    Completed,
    /// No longer actionable.
    Cancelled,
}

impl TaskStatus {
    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a storage value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Actionable item owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<TaskId>,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: i64,
    pub color: Option<String>,
    pub created_at: NaiveDateTime,
}
