//! Month view combining open tasks and recurring habits.
//!
//! # Invariants
//! - Tasks appear on the day they were created; completed tasks never appear.
//! - Daily habits appear on every day, weekly habits on Mondays and monthly
//!   habits on day 1, regardless of when the habit was created.
//! - Both lists of a day keep storage order.

use crate::db::{DbError, Database};
use crate::model::habit::{Frequency, Habit};
use crate::model::task::Task;
use crate::model::UserId;
use crate::repo::habit_repo::{HabitRepository, SqliteHabitRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoError;
use crate::service::task_service::open_tasks_by_day;
use chrono::{Datelike, Months, NaiveDate, Weekday};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CalendarError {
    /// `year`/`month` do not name a calendar month.
    InvalidMonth { year: i32, month: u32 },
    Repo(RepoError),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month } => {
                write!(f, "invalid month {year}-{month}; expected month 1..=12")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidMonth { .. } => None,
        }
    }
}

impl From<RepoError> for CalendarError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for CalendarError {
    fn from(value: DbError) -> Self {
        Self::Repo(value.into())
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Entries shown in one day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
}

pub struct CalendarService {
    db: Database,
}

impl CalendarService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// One entry per day of the month, first day first.
    pub fn calendar_month(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> CalendarResult<Vec<CalendarDay>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::InvalidMonth { year, month })?;

        let (tasks, habits) = self
            .db
            .unit_of_work(|tx| {
                let tasks = SqliteTaskRepository::new(tx).get_all(user_id)?;
                let habits = SqliteHabitRepository::new(tx).get_all(user_id)?;
                Ok::<_, CalendarError>((tasks, habits))
            })
            .inspect_err(|err| {
                warn!("event=calendar_month module=service status=error user_id={user_id} error={err}")
            })?;

        let mut tasks_by_day = open_tasks_by_day(tasks, year, month);
        Ok(month_days(first)
            .map(|date| CalendarDay {
                date,
                tasks: tasks_by_day.remove(&date.day()).unwrap_or_default(),
                habits: habits
                    .iter()
                    .filter(|habit| habit_falls_on(habit.frequency, date))
                    .cloned()
                    .collect(),
            })
            .collect())
    }
}

/// Whether a habit of `frequency` is scheduled on `date`.
pub fn habit_falls_on(frequency: Frequency, date: NaiveDate) -> bool {
    match frequency {
        Frequency::Daily => true,
        Frequency::Weekly => date.weekday() == Weekday::Mon,
        Frequency::Monthly => date.day() == 1,
    }
}

fn month_days(first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let next_month = first.checked_add_months(Months::new(1));
    first
        .iter_days()
        .take_while(move |date| next_month.map_or(true, |end| *date < end))
}
