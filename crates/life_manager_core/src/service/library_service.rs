//! PDF library use-case service.
//!
//! # Responsibility
//! - Register PDF books, track the reading position, keep per-page notes.
//! - Serve page text to the reader view without ever failing the caller.
//!
//! # Invariants
//! - A book row is only written after its file was checked as a readable PDF.
//! - Page numbers and reading positions are zero-based and never negative.
//! - Deleting a book with notes fails with a foreign-key constraint error.

use crate::db::{DbError, Database};
use crate::model::book::{Book, Note};
use crate::model::{now_timestamp, BookId, NoteId, UserId};
use crate::pdf::{PageSource, PdfError, PdfExtractSource};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug)]
pub enum LibraryError {
    EmptyTitle,
    EmptyNote,
    NegativePage(i64),
    /// Page field text is not an integer.
    InvalidPageInput(String),
    Pdf(PdfError),
    BookNotFound(BookId),
    NoteNotFound(NoteId),
    Repo(RepoError),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "book title cannot be empty"),
            Self::EmptyNote => write!(f, "note content cannot be empty"),
            Self::NegativePage(page) => write!(f, "page number cannot be negative: {page}"),
            Self::InvalidPageInput(text) => write!(f, "page number must be an integer, got `{text}`"),
            Self::Pdf(err) => write!(f, "{err}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pdf(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LibraryError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for LibraryError {
    fn from(value: DbError) -> Self {
        Self::Repo(value.into())
    }
}

impl From<PdfError> for LibraryError {
    fn from(value: PdfError) -> Self {
        Self::Pdf(value)
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Books, reading positions and page notes of the local library.
pub struct LibraryService<P: PageSource = PdfExtractSource> {
    db: Database,
    pages: P,
}

impl LibraryService<PdfExtractSource> {
    pub fn new(db: Database) -> Self {
        Self::with_page_source(db, PdfExtractSource)
    }
}

impl<P: PageSource> LibraryService<P> {
    pub fn with_page_source(db: Database, pages: P) -> Self {
        Self { db, pages }
    }

    /// Registers a PDF for `user_id`. Reading starts at page 0.
    pub fn add_book(
        &self,
        user_id: UserId,
        title: &str,
        author: Option<&str>,
        file_path: &str,
    ) -> LibraryResult<Book> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LibraryError::EmptyTitle);
        }

        let page_count = self
            .pages
            .page_count(Path::new(file_path))
            .inspect_err(|err| {
                warn!("event=book_add module=service status=error user_id={user_id} error={err}")
            })?;

        let book = Book {
            id: None,
            user_id,
            title: title.to_string(),
            author: author
                .map(str::trim)
                .filter(|author| !author.is_empty())
                .map(str::to_string),
            file_path: file_path.to_string(),
            current_page: 0,
            created_at: now_timestamp(),
        };
        let created = self
            .db
            .unit_of_work(|tx| SqliteBookRepository::new(tx).create_book(book))
            .map_err(LibraryError::from)?;
        info!(
            "event=book_add module=service status=ok user_id={} book_id={} pages={}",
            user_id,
            created.id.unwrap_or_default(),
            page_count
        );
        Ok(created)
    }

    pub fn get_book(&self, id: BookId) -> LibraryResult<Option<Book>> {
        self.db
            .unit_of_work(|tx| SqliteBookRepository::new(tx).get_book(id))
            .map_err(LibraryError::from)
    }

    pub fn get_user_books(&self, user_id: UserId) -> LibraryResult<Vec<Book>> {
        self.db
            .unit_of_work(|tx| SqliteBookRepository::new(tx).get_books(user_id))
            .map_err(LibraryError::from)
    }

    pub fn update_current_page(&self, book_id: BookId, page: i64) -> LibraryResult<()> {
        if page < 0 {
            return Err(LibraryError::NegativePage(page));
        }
        self.db
            .unit_of_work(|tx| SqliteBookRepository::new(tx).set_current_page(book_id, page))
            .map_err(|err| match err {
                RepoError::NotFound { .. } => LibraryError::BookNotFound(book_id),
                other => LibraryError::Repo(other),
            })
    }

    /// Attaches a note to one page. Content is stored trimmed.
    pub fn add_note(&self, book_id: BookId, page_number: i64, content: &str) -> LibraryResult<Note> {
        if page_number < 0 {
            return Err(LibraryError::NegativePage(page_number));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(LibraryError::EmptyNote);
        }

        let note = Note {
            id: None,
            book_id,
            page_number,
            content: content.to_string(),
            created_at: now_timestamp(),
        };
        self.db
            .unit_of_work(|tx| SqliteBookRepository::new(tx).create_note(note))
            .map_err(LibraryError::from)
            .inspect_err(|err| {
                warn!("event=note_add module=service status=error book_id={book_id} error={err}")
            })
    }

    pub fn get_book_notes(&self, book_id: BookId) -> LibraryResult<Vec<Note>> {
        self.db
            .unit_of_work(|tx| SqliteBookRepository::new(tx).get_notes(book_id))
            .map_err(LibraryError::from)
    }

    pub fn delete_note(&self, note_id: NoteId) -> LibraryResult<()> {
        self.db
            .unit_of_work(|tx| SqliteBookRepository::new(tx).delete_note(note_id))
            .map_err(|err| match err {
                RepoError::NotFound { .. } => LibraryError::NoteNotFound(note_id),
                other => LibraryError::Repo(other),
            })
    }

    /// Removes a book without notes. Notes are never deleted implicitly.
    pub fn delete_book(&self, book_id: BookId) -> LibraryResult<()> {
        self.db
            .unit_of_work(|tx| SqliteBookRepository::new(tx).delete_book(book_id))
            .map_err(|err| match err {
                RepoError::NotFound { .. } => LibraryError::BookNotFound(book_id),
                other => LibraryError::Repo(other),
            })
            .inspect_err(|err| {
                warn!("event=book_delete module=service status=error book_id={book_id} error={err}")
            })
    }

    /// Number of pages in the book's file.
    pub fn page_count(&self, book_id: BookId) -> LibraryResult<usize> {
        let book = self
            .get_book(book_id)?
            .ok_or(LibraryError::BookNotFound(book_id))?;
        Ok(self.pages.page_count(Path::new(&book.file_path))?)
    }

    /// Text of the zero-based page `page_index`.
    ///
    /// Returns an empty string when the book, its file or the page cannot be
    /// read; the cause is logged.
    pub fn get_page_content(&self, book_id: BookId, page_index: usize) -> String {
        let book = match self.get_book(book_id) {
            Ok(Some(book)) => book,
            Ok(None) => {
                warn!("event=page_read module=service status=error book_id={book_id} error_code=book_not_found");
                return String::new();
            }
            Err(err) => {
                warn!("event=page_read module=service status=error book_id={book_id} error={err}");
                return String::new();
            }
        };

        match self.pages.page_text(Path::new(&book.file_path), page_index) {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!(
                    "event=page_read module=service status=error book_id={} page={} error_code=page_out_of_range",
                    book_id, page_index
                );
                String::new()
            }
            Err(err) => {
                warn!(
                    "event=page_read module=service status=error book_id={} page={} error={}",
                    book_id, page_index, err
                );
                String::new()
            }
        }
    }
}

/// Parses a page number typed by the user.
pub fn parse_page_input(text: &str) -> LibraryResult<i64> {
    let trimmed = text.trim();
    let page = trimmed
        .parse::<i64>()
        .map_err(|_| LibraryError::InvalidPageInput(trimmed.to_string()))?;
    if page < 0 {
        return Err(LibraryError::NegativePage(page));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::{parse_page_input, LibraryError};

    #[test]
    fn page_input_accepts_non_negative_integers() {
        assert_eq!(parse_page_input("0").unwrap(), 0);
        assert_eq!(parse_page_input(" 42 ").unwrap(), 42);
    }

    #[test]
    fn page_input_rejects_negative_and_non_numeric() {
        assert!(matches!(
            parse_page_input("-1"),
            Err(LibraryError::NegativePage(-1))
        ));
        assert!(matches!(
            parse_page_input("twelve"),
            Err(LibraryError::InvalidPageInput(_))
        ));
        assert!(matches!(
            parse_page_input(""),
            Err(LibraryError::InvalidPageInput(_))
        ));
    }
}
