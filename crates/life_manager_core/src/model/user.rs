//! User account record.

use crate::model::UserId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Account owning tasks, habits and books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<UserId>,
    /// Unique login name.
    pub username: String,
    /// Hex SHA-256 of the password; the clear text is never stored.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}
