//! Connection gateway for the life manager SQLite file.
//!
//! # Responsibility
//! - Open file connections with the pragmas required by core behavior.
//! - Run parameterized statements with a "log and return nothing" failure
//!   contract for callers that treat errors as no-ops.
//! - Delimit transactions explicitly, either on the owned connection or
//!   through a scoped [`Database::unit_of_work`].
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - `initialize` always leaves the gateway closed.
//! - A failed commit is followed by a rollback.

use super::schema::create_tables;
use super::{DbError, DbResult};
use log::{debug, error, info, warn};
use rusqlite::{Connection, Params, Row, Transaction};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Result handle for a statement that ran successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Rows changed by the statement (0 for DDL and reads).
    pub rows_affected: usize,
    /// Row id of the most recent successful insert on this connection.
    pub last_insert_id: i64,
}

/// Gateway over one SQLite database file.
///
/// Construction is lazy: nothing is opened until [`Database::connect`],
/// [`Database::execute`] or a unit of work needs a connection.
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    conn: Option<Connection>,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// Database file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Whether the owned connection has an open transaction.
    pub fn in_transaction(&self) -> bool {
        self.conn
            .as_ref()
            .is_some_and(|conn| !conn.is_autocommit())
    }

    /// Opens the owned connection. Reuses it when already open.
    pub fn connect(&mut self) -> DbResult<()> {
        if self.conn.is_none() {
            self.conn = Some(open_connection(&self.path)?);
        }
        Ok(())
    }

    /// Releases the owned connection. Safe to call when already closed.
    ///
    /// An open transaction is rolled back by SQLite when the handle closes.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                warn!(
                    "event=db_close module=db status=error path={} error={}",
                    self.path.display(),
                    err
                );
            }
        }
    }

    /// Runs one parameterized statement on the owned connection.
    ///
    /// Connects on demand. Any failure is logged and reported as `None`,
    /// meaning the statement did not happen.
    pub fn execute<P: Params>(&mut self, sql: &str, params: P) -> Option<ExecOutcome> {
        self.run_silently("execute", sql, |conn| {
            let rows_affected = conn.execute(sql, params)?;
            Ok(ExecOutcome {
                rows_affected,
                last_insert_id: conn.last_insert_rowid(),
            })
        })
    }

    /// Runs one parameterized query and maps every row.
    ///
    /// Same failure contract as [`Database::execute`].
    pub fn query_rows<T, P, F>(&mut self, sql: &str, params: P, map: F) -> Option<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.run_silently("query", sql, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(params, map)?;
            rows.collect()
        })
    }

    /// Starts a transaction on the owned connection.
    pub fn begin_transaction(&mut self) -> DbResult<()> {
        let conn = self.connection()?;
        conn.execute_batch("BEGIN;")?;
        Ok(())
    }

    /// Commits the open transaction. On failure the transaction is rolled
    /// back and the commit error is returned.
    pub fn commit(&mut self) -> DbResult<()> {
        let conn = self.connection()?;
        if conn.is_autocommit() {
            return Ok(());
        }

        if let Err(err) = conn.execute_batch("COMMIT;") {
            error!(
                "event=db_commit module=db status=error path={} error={}",
                self.path.display(),
                err
            );
            if !conn.is_autocommit() {
                if let Err(rollback_err) = conn.execute_batch("ROLLBACK;") {
                    error!(
                        "event=db_rollback module=db status=error path={} error={}",
                        self.path.display(),
                        rollback_err
                    );
                }
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Rolls back the open transaction. No-op without one.
    pub fn rollback(&mut self) -> DbResult<()> {
        match self.conn.as_ref() {
            Some(conn) if !conn.is_autocommit() => {
                conn.execute_batch("ROLLBACK;")?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Creates all application tables inside one transaction.
    ///
    /// The connection is closed afterwards whatever the outcome.
    pub fn initialize(&mut self) -> DbResult<()> {
        let started_at = Instant::now();
        let result = self.create_schema();
        self.close();

        match &result {
            Ok(()) => info!(
                "event=db_init module=db status=ok path={} duration_ms={}",
                self.path.display(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=db_init module=db status=error path={} duration_ms={} error={}",
                self.path.display(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Runs `work` inside one transaction on a dedicated connection.
    ///
    /// The connection is opened for this call only and closed on return.
    /// `Ok` commits; `Err` (from `work` or from the commit) rolls back.
    pub fn unit_of_work<T, E, F>(&self, work: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    {
        let mut conn = open_connection(&self.path)?;
        let tx = conn.transaction().map_err(DbError::from)?;
        let value = work(&tx)?;
        if let Err(err) = tx.commit() {
            error!(
                "event=unit_of_work module=db status=error stage=commit path={} error={}",
                self.path.display(),
                err
            );
            return Err(DbError::from(err).into());
        }
        Ok(value)
    }

    fn create_schema(&mut self) -> DbResult<()> {
        self.connect()?;
        self.begin_transaction()?;
        let outcome = create_tables(self.connection()?);
        match outcome {
            Ok(()) => self.commit(),
            Err(err) => {
                self.rollback()?;
                Err(err)
            }
        }
    }

    fn connection(&self) -> DbResult<&Connection> {
        self.conn.as_ref().ok_or(DbError::NotConnected)
    }

    fn run_silently<T>(
        &mut self,
        op: &'static str,
        sql: &str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Option<T> {
        if let Err(err) = self.connect() {
            error!(
                "event=db_{op} module=db status=error error_code=db_connect_failed error={}",
                err
            );
            return None;
        }
        let conn = self.conn.as_ref()?;
        match f(conn) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(
                    "event=db_{op} module=db status=error sql={} error={}",
                    compact_sql(sql),
                    err
                );
                None
            }
        }
    }
}

/// Opens a connection to `path` with foreign keys and busy timeout enabled.
///
/// Creates the parent directory when it does not exist yet.
pub fn open_connection(path: &Path) -> DbResult<Connection> {
    let started_at = Instant::now();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error path={} duration_ms={} error_code=db_open_failed error={}",
                path.display(),
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    debug!(
        "event=db_open module=db status=ok path={} duration_ms={}",
        path.display(),
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn compact_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
