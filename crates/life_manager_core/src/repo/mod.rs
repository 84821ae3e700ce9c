//! Repository layer: typed row mapping over borrowed connections.
//!
//! # Responsibility
//! - Keep SQL and row decoding out of the service layer.
//! - Translate driver failures into semantic errors (`NotFound`,
//!   `Constraint`) next to transport errors.
//!
//! # Invariants
//! - Repositories never open, commit or close connections; the caller owns
//!   the unit of work they run in.
//! - Read paths reject malformed persisted values instead of masking them.

use crate::db::DbError;
use crate::model::parse_timestamp;
use chrono::NaiveDateTime;
use rusqlite::{ffi, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book_repo;
pub mod habit_repo;
pub mod task_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Which storage constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Other,
}

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: i64 },
    /// Write path received a record that was never persisted.
    MissingId(&'static str),
    InvalidData(String),
    Constraint {
        kind: ConstraintKind,
        message: String,
    },
}

impl RepoError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Constraint {
                kind: ConstraintKind::Unique,
                ..
            }
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingId(entity) => write!(f, "{entity} has no id; persist it first"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Constraint { kind, message } => {
                write!(f, "constraint violation ({kind:?}): {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(inner, message) = &value {
            if inner.code == ErrorCode::ConstraintViolation {
                let kind = match inner.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        ConstraintKind::Unique
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    _ => ConstraintKind::Other,
                };
                return Self::Constraint {
                    kind,
                    message: message.clone().unwrap_or_else(|| inner.to_string()),
                };
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Reads and parses the `created_at` column of `table`.
pub(crate) fn created_at_column(row: &Row<'_>, table: &str) -> RepoResult<NaiveDateTime> {
    let text: String = row.get("created_at")?;
    parse_timestamp(&text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{text}` in {table}.created_at"
        ))
    })
}

/// Maps a zero-row write to `NotFound`.
pub(crate) fn expect_changed(changed: usize, entity: &'static str, id: i64) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}
