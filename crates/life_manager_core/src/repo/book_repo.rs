//! Book and page-note repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting a book never deletes its notes. With notes present the
//!   foreign key rejects the delete and a `Constraint` error is returned.
//! - Notes are listed by page, then by creation order.

use crate::model::book::{Book, Note};
use crate::model::{format_timestamp, BookId, NoteId, UserId};
use crate::repo::{created_at_column, expect_changed, RepoResult};
use rusqlite::{params, Connection, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    author,
    file_path,
    current_page,
    created_at
FROM books";

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    book_id,
    page_number,
    content,
    created_at
FROM notes";

/// Repository interface for books and their notes.
pub trait BookRepository {
    fn create_book(&self, book: Book) -> RepoResult<Book>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn get_books(&self, user_id: UserId) -> RepoResult<Vec<Book>>;
    fn set_current_page(&self, id: BookId, page: i64) -> RepoResult<()>;
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
    fn create_note(&self, note: Note) -> RepoResult<Note>;
    fn get_notes(&self, book_id: BookId) -> RepoResult<Vec<Note>>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, mut book: Book) -> RepoResult<Book> {
        self.conn.execute(
            "INSERT INTO books (user_id, title, author, file_path, current_page, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                book.user_id,
                book.title.as_str(),
                book.author.as_deref(),
                book.file_path.as_str(),
                book.current_page,
                format_timestamp(&book.created_at),
            ],
        )?;
        book.id = Some(self.conn.last_insert_rowid());
        Ok(book)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }
        Ok(None)
    }

    fn get_books(&self, user_id: UserId) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([user_id])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn set_current_page(&self, id: BookId, page: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE books SET current_page = ?1 WHERE id = ?2;",
            params![page, id],
        )?;
        expect_changed(changed, "book", id)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        expect_changed(changed, "book", id)
    }

    fn create_note(&self, mut note: Note) -> RepoResult<Note> {
        self.conn.execute(
            "INSERT INTO notes (book_id, page_number, content, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                note.book_id,
                note.page_number,
                note.content.as_str(),
                format_timestamp(&note.created_at),
            ],
        )?;
        note.id = Some(self.conn.last_insert_rowid());
        Ok(note)
    }

    fn get_notes(&self, book_id: BookId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE book_id = ?1 ORDER BY page_number ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([book_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        expect_changed(changed, "note", id)
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    Ok(Book {
        id: Some(row.get("id")?),
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        file_path: row.get("file_path")?,
        current_page: row.get("current_page")?,
        created_at: created_at_column(row, "books")?,
    })
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    Ok(Note {
        id: Some(row.get("id")?),
        book_id: row.get("book_id")?,
        page_number: row.get("page_number")?,
        content: row.get("content")?,
        created_at: created_at_column(row, "notes")?,
    })
}
