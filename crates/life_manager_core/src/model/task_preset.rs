//! Task creation presets.
//!
//! A preset decides the initial status, priority and color of a new task.
//! The set is closed: `simple` and `urgent`.

use crate::model::task::{Task, TaskStatus};
use crate::model::{now_timestamp, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Color tag applied to urgent tasks.
pub const URGENT_TASK_COLOR: &str = "#ff0000";

/// Rejected preset tag (invalid argument).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTaskPreset(pub String);

impl Display for UnknownTaskPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown task type `{}`; expected simple|urgent",
            self.0
        )
    }
}

impl Error for UnknownTaskPreset {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskPreset {
    #[default]
    Simple,
    Urgent,
}

impl TaskPreset {
    /// Resolves a preset from its tag. Matching is exact.
    pub fn from_tag(tag: &str) -> Result<Self, UnknownTaskPreset> {
        match tag {
            "simple" => Ok(Self::Simple),
            "urgent" => Ok(Self::Urgent),
            other => Err(UnknownTaskPreset(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Urgent => "urgent",
        }
    }

    pub fn priority(self) -> i64 {
        match self {
            Self::Simple => 1,
            Self::Urgent => 3,
        }
    }

    pub fn color(self) -> Option<&'static str> {
        match self {
            Self::Simple => None,
            Self::Urgent => Some(URGENT_TASK_COLOR),
        }
    }

    /// Builds an unpersisted task with status `new`.
    pub fn build(
        self,
        user_id: UserId,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Task {
        Task {
            id: None,
            user_id,
            title: title.into(),
            description,
            status: TaskStatus::New,
            priority: self.priority(),
            color: self.color().map(str::to_string),
            created_at: now_timestamp(),
        }
    }
}
