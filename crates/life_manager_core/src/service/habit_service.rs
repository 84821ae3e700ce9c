//! Habit use-case service and reminder check.
//!
//! # Responsibility
//! - Create, list, update and delete habits.
//! - Publish reminder messages for habits due at the current minute.
//!
//! # Invariants
//! - Reminder times are `HH:MM` (24h) or absent.
//! - A reminder check publishes one message per matching habit and does not
//!   remember earlier checks; running it twice in one minute notifies twice.

use crate::db::{DbError, Database};
use crate::model::habit::{Frequency, Habit};
use crate::model::{now_timestamp, HabitId, UserId};
use crate::notify::NotificationCenter;
use crate::repo::habit_repo::{HabitRepository, SqliteHabitRepository};
use crate::repo::RepoError;
use chrono::{Local, NaiveTime};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static REMINDER_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid reminder time regex")
});

/// Clock format compared against stored reminder times.
pub const REMINDER_CLOCK_FORMAT: &str = "%H:%M";

#[derive(Debug)]
pub enum HabitServiceError {
    EmptyName,
    /// Reminder is not a 24h `HH:MM` value.
    InvalidReminderTime(String),
    HabitNotFound(HabitId),
    Repo(RepoError),
}

impl Display for HabitServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "habit name cannot be empty"),
            Self::InvalidReminderTime(value) => {
                write!(f, "invalid reminder time `{value}`; expected HH:MM")
            }
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HabitServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for HabitServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::HabitNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for HabitServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(value.into())
    }
}

pub type HabitServiceResult<T> = Result<T, HabitServiceError>;

pub struct HabitService {
    db: Database,
    notifications: NotificationCenter<String>,
}

impl HabitService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            notifications: NotificationCenter::new(),
        }
    }

    pub fn create_habit(
        &self,
        user_id: UserId,
        name: &str,
        frequency: Frequency,
        reminder_time: Option<&str>,
    ) -> HabitServiceResult<Habit> {
        let habit = Habit {
            id: None,
            user_id,
            name: normalize_name(name)?,
            frequency,
            reminder_time: normalize_reminder_time(reminder_time)?,
            created_at: now_timestamp(),
        };

        let created = self
            .db
            .unit_of_work(|tx| SqliteHabitRepository::new(tx).create(habit))
            .map_err(HabitServiceError::from)
            .inspect_err(|err| {
                warn!("event=habit_create module=service status=error user_id={user_id} error={err}")
            })?;
        info!(
            "event=habit_create module=service status=ok user_id={} habit_id={}",
            user_id,
            created.id.unwrap_or_default()
        );
        Ok(created)
    }

    pub fn get_habit(&self, id: HabitId) -> HabitServiceResult<Option<Habit>> {
        self.db
            .unit_of_work(|tx| SqliteHabitRepository::new(tx).get_by_id(id))
            .map_err(HabitServiceError::from)
    }

    pub fn get_user_habits(&self, user_id: UserId) -> HabitServiceResult<Vec<Habit>> {
        self.db
            .unit_of_work(|tx| SqliteHabitRepository::new(tx).get_all(user_id))
            .map_err(HabitServiceError::from)
    }

    /// Persists name, frequency and reminder of an existing habit.
    ///
    /// Returns the habit as stored, with normalized fields.
    pub fn update_habit(&self, habit: &Habit) -> HabitServiceResult<Habit> {
        let mut updated = habit.clone();
        updated.name = normalize_name(&habit.name)?;
        updated.reminder_time = normalize_reminder_time(habit.reminder_time.as_deref())?;

        self.db.unit_of_work(|tx| {
            SqliteHabitRepository::new(tx).update(&updated)?;
            Ok::<_, HabitServiceError>(())
        })?;
        Ok(updated)
    }

    pub fn delete_habit(&self, id: HabitId) -> HabitServiceResult<()> {
        self.db
            .unit_of_work(|tx| SqliteHabitRepository::new(tx).delete(id))
            .map_err(HabitServiceError::from)
    }

    /// Runs the reminder check against the local wall clock.
    pub fn check_reminders(&mut self) -> HabitServiceResult<usize> {
        self.check_reminders_at(Local::now().time())
    }

    /// Publishes one reminder per habit whose reminder equals `now` as
    /// `HH:MM`. Returns the number of published messages.
    pub fn check_reminders_at(&mut self, now: NaiveTime) -> HabitServiceResult<usize> {
        let clock = now.format(REMINDER_CLOCK_FORMAT).to_string();
        let due = self
            .db
            .unit_of_work(|tx| SqliteHabitRepository::new(tx).get_by_reminder_time(&clock))
            .map_err(HabitServiceError::from)
            .inspect_err(|err| {
                warn!("event=reminder_check module=service status=error clock={clock} error={err}")
            })?;

        for habit in &due {
            self.notifications.publish(reminder_message(&habit.name));
        }
        debug!(
            "event=reminder_check module=service status=ok clock={} published={}",
            clock,
            due.len()
        );
        Ok(due.len())
    }

    pub fn notifications(&self) -> &NotificationCenter<String> {
        &self.notifications
    }

    /// Mutable access for attaching and detaching subscribers.
    pub fn notifications_mut(&mut self) -> &mut NotificationCenter<String> {
        &mut self.notifications
    }
}

/// Text published when a habit is due.
pub fn reminder_message(habit_name: &str) -> String {
    format!("Reminder: time to do habit '{habit_name}'")
}

fn normalize_name(name: &str) -> HabitServiceResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HabitServiceError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Blank reminders mean "no reminder"; anything else must be `HH:MM`.
pub fn normalize_reminder_time(value: Option<&str>) -> HabitServiceResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(time) if REMINDER_TIME_RE.is_match(time) => Ok(Some(time.to_string())),
        Some(time) => Err(HabitServiceError::InvalidReminderTime(time.to_string())),
    }
}
