//! User account repository.

use crate::model::user::User;
use crate::model::{format_timestamp, UserId};
use crate::repo::{created_at_column, RepoResult};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, password_hash, created_at FROM users";

pub trait UserRepository {
    /// Inserts a user. A taken username is a unique `Constraint` error.
    fn create(&self, user: User) -> RepoResult<User>;
    fn get_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Exact match on both username and stored password hash.
    fn find_by_credentials(&self, username: &str, password_hash: &str)
        -> RepoResult<Option<User>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create(&self, mut user: User) -> RepoResult<User> {
        self.conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3);",
            params![
                user.username.as_str(),
                user.password_hash.as_str(),
                format_timestamp(&user.created_at),
            ],
        )?;
        user.id = Some(self.conn.last_insert_rowid());
        Ok(user)
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn find_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "{USER_SELECT_SQL} WHERE username = ?1 AND password_hash = ?2;"
        ))?;
        let mut rows = stmt.query([username, password_hash])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: Some(row.get("id")?),
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        created_at: created_at_column(row, "users")?,
    })
}
