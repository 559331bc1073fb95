use crate::layout::RenderedPage;
use std::path::Path;
use thiserror::Error;

pub mod pdf;

pub use pdf::{PdfSink, PdfSource};

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document parse error: {0}")]
    Parse(String),

    #[error("document write error: {0}")]
    Write(String),

    #[error("file not found: {0}")]
    FileNotFound(std::path::PathBuf),
}

/// Read side of the opaque document collaborator: an ordered sequence of
/// page texts, possibly empty strings.
pub trait DocumentSource {
    fn page_texts(&self) -> &[String];

    fn page_count(&self) -> usize {
        self.page_texts().len()
    }
}

/// Write side: collects composed pages and performs a single final write.
/// Source documents are never mutated; a destination is built page by page.
pub trait DocumentSink {
    fn append_page(&mut self, page: &RenderedPage);

    fn page_count(&self) -> usize;

    fn write(&self, path: &Path) -> Result<(), DocumentError>;
}

/// In-memory document honoring both collaborator contracts. Appended pages
/// expose their cached text, which mirrors what a rendered page would give
/// back through extraction.
#[derive(Debug, Default, Clone)]
pub struct MemoryDocument {
    pages: Vec<String>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }
}

impl DocumentSource for MemoryDocument {
    fn page_texts(&self) -> &[String] {
        &self.pages
    }
}

impl DocumentSink for MemoryDocument {
    fn append_page(&mut self, page: &RenderedPage) {
        self.pages.push(page.cached_text.clone());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn write(&self, _path: &Path) -> Result<(), DocumentError> {
        Ok(())
    }
}
