//! Read-only access to PDF pages.
//!
//! # Responsibility
//! - Count pages and extract per-page text for the reader view.
//!
//! # Invariants
//! - Parser panics never cross this boundary; they surface as
//!   [`PdfError::Unreadable`].

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfError {
    Missing(PathBuf),
    Unreadable { path: PathBuf, reason: String },
}

impl Display for PdfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "pdf file not found: {}", path.display()),
            Self::Unreadable { path, reason } => {
                write!(f, "pdf file unreadable: {} ({reason})", path.display())
            }
        }
    }
}

impl Error for PdfError {}

pub type PdfResult<T> = Result<T, PdfError>;

/// Source of page-level document text.
pub trait PageSource {
    fn page_count(&self, path: &Path) -> PdfResult<usize>;

    /// Text of the zero-based page `index`, `None` when out of range.
    fn page_text(&self, path: &Path, index: usize) -> PdfResult<Option<String>>;
}

/// [`PageSource`] backed by `pdf-extract`.
///
/// Every call parses the file again; nothing is cached between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractSource;

impl PdfExtractSource {
    fn pages(&self, path: &Path) -> PdfResult<Vec<String>> {
        if !path.is_file() {
            return Err(PdfError::Missing(path.to_path_buf()));
        }

        // pdf-extract can panic on malformed input
        let path_buf = path.to_path_buf();
        let result =
            std::panic::catch_unwind(move || pdf_extract::extract_text_by_pages(&path_buf));

        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(err)) => Err(PdfError::Unreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }),
            Err(_) => Err(PdfError::Unreadable {
                path: path.to_path_buf(),
                reason: "parser panicked on malformed file".to_string(),
            }),
        }
    }
}

impl PageSource for PdfExtractSource {
    fn page_count(&self, path: &Path) -> PdfResult<usize> {
        self.pages(path).map(|pages| pages.len())
    }

    fn page_text(&self, path: &Path, index: usize) -> PdfResult<Option<String>> {
        Ok(self.pages(path)?.into_iter().nth(index))
    }
}
