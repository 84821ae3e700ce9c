//! Habit repository contract and SQLite implementation.

use crate::model::habit::{Frequency, Habit};
use crate::model::{format_timestamp, HabitId, UserId};
use crate::repo::{created_at_column, expect_changed, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, ToSql};

const HABIT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    frequency,
    reminder_time,
    created_at
FROM habits";

/// Repository interface for habits.
pub trait HabitRepository {
    fn create(&self, habit: Habit) -> RepoResult<Habit>;
    fn get_by_id(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    fn get_all(&self, user_id: UserId) -> RepoResult<Vec<Habit>>;
    /// Habits of every owner whose reminder equals `time` exactly.
    fn get_by_reminder_time(&self, time: &str) -> RepoResult<Vec<Habit>>;
    /// Overwrites name, frequency and reminder time.
    fn update(&self, habit: &Habit) -> RepoResult<()>;
    fn delete(&self, id: HabitId) -> RepoResult<()>;
}

pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn select(&self, filter: &str, bind: &[&dyn ToSql]) -> RepoResult<Vec<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} {filter} ORDER BY id ASC;"))?;
        let mut rows = stmt.query(bind)?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create(&self, mut habit: Habit) -> RepoResult<Habit> {
        self.conn.execute(
            "INSERT INTO habits (user_id, name, frequency, reminder_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                habit.user_id,
                habit.name.as_str(),
                habit.frequency.as_str(),
                habit.reminder_time.as_deref(),
                format_timestamp(&habit.created_at),
            ],
        )?;
        habit.id = Some(self.conn.last_insert_rowid());
        Ok(habit)
    }

    fn get_by_id(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        Ok(self.select("WHERE id = ?1", &[&id])?.into_iter().next())
    }

    fn get_all(&self, user_id: UserId) -> RepoResult<Vec<Habit>> {
        self.select("WHERE user_id = ?1", &[&user_id])
    }

    fn get_by_reminder_time(&self, time: &str) -> RepoResult<Vec<Habit>> {
        self.select("WHERE reminder_time = ?1", &[&time])
    }

    fn update(&self, habit: &Habit) -> RepoResult<()> {
        let id = habit.id.ok_or(RepoError::MissingId("habit"))?;
        let changed = self.conn.execute(
            "UPDATE habits
             SET name = ?1, frequency = ?2, reminder_time = ?3
             WHERE id = ?4;",
            params![
                habit.name.as_str(),
                habit.frequency.as_str(),
                habit.reminder_time.as_deref(),
                id,
            ],
        )?;
        expect_changed(changed, "habit", id)
    }

    fn delete(&self, id: HabitId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1;", [id])?;
        expect_changed(changed, "habit", id)
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let frequency_text: String = row.get("frequency")?;
    let frequency = Frequency::parse(&frequency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid frequency `{frequency_text}` in habits.frequency"
        ))
    })?;

    Ok(Habit {
        id: Some(row.get("id")?),
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        frequency,
        reminder_time: row.get("reminder_time")?,
        created_at: created_at_column(row, "habits")?,
    })
}
