//! Library book and per-page note records.

use crate::model::{BookId, NoteId, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// PDF registered in a user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<BookId>,
    pub user_id: UserId,
    pub title: String,
    pub author: Option<String>,
    /// Location of the PDF on disk, as supplied by the file chooser.
    pub file_path: String,
    /// Zero-based reading position. Never negative.
    pub current_page: i64,
    pub created_at: NaiveDateTime,
}

/// Free-text note attached to one page of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Option<NoteId>,
    pub book_id: BookId,
    /// Zero-based page index. Never negative.
    pub page_number: i64,
    pub content: String,
    pub created_at: NaiveDateTime,
}
