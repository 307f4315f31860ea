//! Rendering: serializes laid-out pages into a document format.
//!
//! Layout never touches a file format; it hands a `Vec<Page>` to a
//! `DocumentWriter`. `PdfDocumentWriter` is the only backend today.

pub mod pdf;

use serde::Serialize;

use crate::errors::AppError;
use crate::layout::Page;

pub use pdf::PdfDocumentWriter;

/// Document-level metadata written alongside the pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentMeta {
    pub title: String,
    pub author: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Turns pages into bytes. Implementations must be deterministic: identical
/// pages and metadata produce identical output.
pub trait DocumentWriter: Send + Sync {
    fn write(&self, pages: &[Page], meta: &DocumentMeta) -> Result<Vec<u8>, AppError>;

    /// Backend identifier, logged on export.
    fn backend_name(&self) -> &'static str;
}
