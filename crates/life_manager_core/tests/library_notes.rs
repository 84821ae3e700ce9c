use life_manager_core::pdf::{PageSource, PdfError, PdfResult};
use life_manager_core::{
    AuthService, ConstraintKind, Database, LibraryError, LibraryService, RepoError,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Serves fixed page texts for any existing file whose name does not
/// start with `broken`.
struct FakePages {
    pages: Vec<&'static str>,
}

impl PageSource for FakePages {
    fn page_count(&self, path: &Path) -> PdfResult<usize> {
        check(path)?;
        Ok(self.pages.len())
    }

    fn page_text(&self, path: &Path, index: usize) -> PdfResult<Option<String>> {
        check(path)?;
        Ok(self.pages.get(index).map(|text| text.to_string()))
    }
}

fn check(path: &Path) -> PdfResult<()> {
    if !path.exists() {
        return Err(PdfError::Missing(path.to_path_buf()));
    }
    let broken = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("broken"));
    if broken {
        return Err(PdfError::Unreadable {
            path: path.to_path_buf(),
            reason: "fake parse failure".to_string(),
        });
    }
    Ok(())
}

struct Fixture {
    dir: TempDir,
    library: LibraryService<FakePages>,
    user_id: i64,
}

impl Fixture {
    fn file(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4 fake").unwrap();
        path
    }
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("life.db");
    Database::new(&path).initialize().unwrap();
    let user = AuthService::new(Database::new(&path))
        .register("reader", "secret1")
        .unwrap();
    let library = LibraryService::with_page_source(
        Database::new(&path),
        FakePages {
            pages: vec!["Chapter one", "Chapter two", "Appendix"],
        },
    );
    Fixture {
        dir,
        library,
        user_id: user.id.unwrap(),
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn add_book_checks_file_and_starts_at_page_zero() {
    let fx = fixture();
    let file = fx.file("dune.pdf");

    let book = fx
        .library
        .add_book(fx.user_id, " Dune ", Some("Frank Herbert"), path_str(&file))
        .unwrap();
    assert_eq!(book.title, "Dune");
    assert_eq!(book.author.as_deref(), Some("Frank Herbert"));
    assert_eq!(book.current_page, 0);

    let id = book.id.unwrap();
    assert_eq!(fx.library.get_book(id).unwrap(), Some(book.clone()));
    assert_eq!(fx.library.get_user_books(fx.user_id).unwrap(), vec![book]);
    assert_eq!(fx.library.page_count(id).unwrap(), 3);
}

#[test]
fn add_book_rejects_blank_title_missing_and_unreadable_files() {
    let fx = fixture();
    let good = fx.file("ok.pdf");
    let broken = fx.file("broken.pdf");
    let missing = fx.dir.path().join("missing.pdf");

    assert!(matches!(
        fx.library.add_book(fx.user_id, "  ", None, path_str(&good)),
        Err(LibraryError::EmptyTitle)
    ));
    assert!(matches!(
        fx.library.add_book(fx.user_id, "Gone", None, path_str(&missing)),
        Err(LibraryError::Pdf(PdfError::Missing(_)))
    ));
    assert!(matches!(
        fx.library.add_book(fx.user_id, "Bad", None, path_str(&broken)),
        Err(LibraryError::Pdf(PdfError::Unreadable { .. }))
    ));
    assert!(fx.library.get_user_books(fx.user_id).unwrap().is_empty());
}

#[test]
fn reading_position_updates_and_rejects_negative_pages() {
    let fx = fixture();
    let file = fx.file("book.pdf");
    let id = fx
        .library
        .add_book(fx.user_id, "Book", None, path_str(&file))
        .unwrap()
        .id
        .unwrap();

    fx.library.update_current_page(id, 2).unwrap();
    assert_eq!(fx.library.get_book(id).unwrap().unwrap().current_page, 2);

    assert!(matches!(
        fx.library.update_current_page(id, -1),
        Err(LibraryError::NegativePage(-1))
    ));
    assert!(matches!(
        fx.library.update_current_page(id + 50, 1),
        Err(LibraryError::BookNotFound(_))
    ));
}

#[test]
fn notes_are_listed_by_page_and_can_be_deleted() {
    let fx = fixture();
    let file = fx.file("book.pdf");
    let id = fx
        .library
        .add_book(fx.user_id, "Book", None, path_str(&file))
        .unwrap()
        .id
        .unwrap();

    let late = fx.library.add_note(id, 5, "later thought").unwrap();
    let early = fx.library.add_note(id, 1, "  first thought ").unwrap();
    assert_eq!(early.content, "first thought");

    let notes = fx.library.get_book_notes(id).unwrap();
    assert_eq!(notes, vec![early.clone(), late.clone()]);

    fx.library.delete_note(late.id.unwrap()).unwrap();
    assert_eq!(fx.library.get_book_notes(id).unwrap(), vec![early]);
    assert!(matches!(
        fx.library.delete_note(late.id.unwrap()),
        Err(LibraryError::NoteNotFound(_))
    ));
}

#[test]
fn add_note_validates_page_content_and_book() {
    let fx = fixture();
    assert!(matches!(
        fx.library.add_note(1, -3, "text"),
        Err(LibraryError::NegativePage(-3))
    ));
    assert!(matches!(
        fx.library.add_note(1, 0, " \n "),
        Err(LibraryError::EmptyNote)
    ));
    assert!(matches!(
        fx.library.add_note(404, 0, "dangling"),
        Err(LibraryError::Repo(RepoError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        }))
    ));
}

#[test]
fn delete_book_does_not_cascade_to_notes() {
    let fx = fixture();
    let file = fx.file("book.pdf");
    let id = fx
        .library
        .add_book(fx.user_id, "Book", None, path_str(&file))
        .unwrap()
        .id
        .unwrap();
    let note = fx.library.add_note(id, 0, "keep me").unwrap();

    assert!(matches!(
        fx.library.delete_book(id),
        Err(LibraryError::Repo(RepoError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        }))
    ));
    assert!(fx.library.get_book(id).unwrap().is_some());

    fx.library.delete_note(note.id.unwrap()).unwrap();
    fx.library.delete_book(id).unwrap();
    assert!(fx.library.get_book(id).unwrap().is_none());
    assert!(matches!(
        fx.library.delete_book(id),
        Err(LibraryError::BookNotFound(_))
    ));
}

#[test]
fn page_content_is_empty_on_any_failure() {
    let fx = fixture();
    let file = fx.file("book.pdf");
    let id = fx
        .library
        .add_book(fx.user_id, "Book", None, path_str(&file))
        .unwrap()
        .id
        .unwrap();

    assert_eq!(fx.library.get_page_content(id, 1), "Chapter two");
    assert_eq!(fx.library.get_page_content(id, 3), "");
    assert_eq!(fx.library.get_page_content(id + 1, 0), "");

    std::fs::remove_file(&file).unwrap();
    assert_eq!(fx.library.get_page_content(id, 0), "");
    assert!(matches!(
        fx.library.page_count(id),
        Err(LibraryError::Pdf(PdfError::Missing(_)))
    ));
}

#[test]
fn default_pdf_source_rejects_non_pdf_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("life.db");
    Database::new(&path).initialize().unwrap();
    let user_id = AuthService::new(Database::new(&path))
        .register("reader", "secret1")
        .unwrap()
        .id
        .unwrap();
    let library = LibraryService::new(Database::new(&path));

    let text_file = dir.path().join("notes.pdf");
    std::fs::write(&text_file, b"plain text, not a pdf").unwrap();
    assert!(matches!(
        library.add_book(user_id, "Fake", None, path_str(&text_file)),
        Err(LibraryError::Pdf(PdfError::Unreadable { .. }))
    ));
    assert!(library.get_user_books(user_id).unwrap().is_empty());
}
