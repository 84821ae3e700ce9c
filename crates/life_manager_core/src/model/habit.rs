//! Habit record and repetition frequency.

use crate::model::{HabitId, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How often a habit is meant to be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Parses a storage value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: Option<HabitId>,
    pub user_id: UserId,
    pub name: String,
    pub frequency: Frequency,
    /// Wall-clock `HH:MM` text. Compared verbatim, no calendar semantics.
    pub reminder_time: Option<String>,
    pub created_at: NaiveDateTime,
}
