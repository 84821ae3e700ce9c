//! Domain records for users, tasks, habits, books and book notes.
//!
//! # Responsibility
//! - Define the typed records mapped by repositories.
//! - Own the timestamp format shared by every table.
//!
//! # Invariants
//! - `id` is `None` until the row is persisted and never changes afterwards.
//! - `created_at` is whole-second local time, set once at creation.

use chrono::{Local, NaiveDateTime, Timelike};

pub mod book;
pub mod habit;
pub mod task;
pub mod task_preset;
pub mod user;

/// Storage format for every `created_at` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type UserId = i64;
pub type TaskId = i64;
pub type HabitId = i64;
pub type BookId = i64;
pub type NoteId = i64;

/// Current local time truncated to whole seconds.
///
/// Truncation keeps in-memory records equal to what a read-back returns.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Renders a timestamp in the storage format.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp. Returns `None` for any other shape.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}
