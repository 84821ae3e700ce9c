//! Application schema definition.
//!
//! # Invariants
//! - Every statement is `IF NOT EXISTS`, so applying the schema twice is a
//!   no-op.
//! - Child tables reference their owner through a foreign key without
//!   `ON DELETE` actions; parent rows with children cannot be removed.

use crate::db::DbResult;
use rusqlite::Connection;

/// DDL for `users`, `tasks`, `habits`, `books` and `notes`.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables created by [`SCHEMA_SQL`], parents first.
pub const TABLES: &[&str] = &["users", "tasks", "habits", "books", "notes"];

/// Runs the schema DDL on the given connection.
///
/// The caller owns the transaction boundary.
pub fn create_tables(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
