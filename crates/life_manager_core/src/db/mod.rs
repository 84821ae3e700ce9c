//! SQLite persistence gateway and schema bootstrap.
//!
//! # Responsibility
//! - Own file-backed SQLite connections for the life manager core.
//! - Provide explicit transaction boundaries and the per-call unit of work.
//! - Create the five application tables when absent.
//!
//! # Invariants
//! - Every opened connection has `foreign_keys=ON`.
//! - A unit of work commits only when its body succeeds; otherwise it rolls
//!   back and leaves storage untouched.
//! - Connections never outlive the logical operation that opened them.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod gateway;
pub mod schema;

pub use gateway::{open_connection, Database, ExecOutcome};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Database directory could not be prepared.
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    /// Operation needs an open connection, but the gateway is closed.
    NotConnected,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "database directory error: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::NotConnected => write!(f, "database connection is not open"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::NotConnected => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
