//! Account registration, login and the explicit session.
//!
//! # Responsibility
//! - Validate credentials and store only their SHA-256 hash.
//! - Track the logged-in user in a caller-owned [`Session`].
//!
//! # Invariants
//! - Usernames are unique; a duplicate registration leaves the existing row
//!   untouched.
//! - A failed login never changes the session.

use crate::db::{DbError, Database};
use crate::model::now_timestamp;
use crate::model::user::User;
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::RepoError;
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug)]
pub enum AuthError {
    EmptyCredentials,
    UsernameTooShort,
    PasswordTooShort,
    UsernameTaken(String),
    InvalidCredentials,
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCredentials => write!(f, "username and password are required"),
            Self::UsernameTooShort => write!(
                f,
                "username must have at least {MIN_USERNAME_CHARS} characters"
            ),
            Self::PasswordTooShort => write!(
                f,
                "password must have at least {MIN_PASSWORD_CHARS} characters"
            ),
            Self::UsernameTaken(name) => write!(f, "username `{name}` is already taken"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for AuthError {
    fn from(value: DbError) -> Self {
        Self::Repo(value.into())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Currently authenticated user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

pub struct AuthService {
    db: Database,
}

impl AuthService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn register(&self, username: &str, password: &str) -> AuthResult<User> {
        let (username, password) = validate_credentials(username, password)?;
        let user = User {
            id: None,
            username: username.to_string(),
            password_hash: hash_password(password),
            created_at: now_timestamp(),
        };

        let created = self
            .db
            .unit_of_work(|tx| SqliteUserRepository::new(tx).create(user))
            .map_err(|err| {
                if err.is_unique_violation() {
                    AuthError::UsernameTaken(username.to_string())
                } else {
                    AuthError::Repo(err)
                }
            })
            .inspect_err(|err| warn!("event=user_register module=service status=error error={err}"))?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            created.id.unwrap_or_default()
        );
        Ok(created)
    }

    /// Authenticates and stores the user in `session`.
    pub fn login(&self, session: &mut Session, username: &str, password: &str) -> AuthResult<User> {
        let (username, password) = validate_credentials(username, password)?;
        let password_hash = hash_password(password);

        let found = self.db.unit_of_work(|tx| {
            SqliteUserRepository::new(tx).find_by_credentials(username, &password_hash)
        })?;
        let Some(user) = found else {
            warn!("event=user_login module=service status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };

        info!(
            "event=user_login module=service status=ok user_id={}",
            user.id.unwrap_or_default()
        );
        session.user = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&self, session: &mut Session) {
        if let Some(user) = session.user.take() {
            info!(
                "event=user_logout module=service status=ok user_id={}",
                user.id.unwrap_or_default()
            );
        }
    }
}

/// Lowercase hex SHA-256 of `password`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Trims both fields and enforces the minimum lengths.
pub fn validate_credentials<'a>(
    username: &'a str,
    password: &'a str,
) -> AuthResult<(&'a str, &'a str)> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::EmptyCredentials);
    }
    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(AuthError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::PasswordTooShort);
    }
    Ok((username, password))
}
