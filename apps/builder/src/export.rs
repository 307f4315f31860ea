//! Export: layout, PDF serialization and the file save.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::layout::{default_page_config, layout_document};
use crate::models::{ResumeDocument, StyleConfig};
use crate::render::{DocumentMeta, DocumentWriter, PdfDocumentWriter};
use crate::store::completeness::compute_completeness_report;

const FALLBACK_STEM: &str = "Resume";

/// Result of a successful export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: usize,
    /// Required fields that were still empty at export time.
    pub missing_required: Vec<&'static str>,
}

/// `Jane Doe` → `Jane_Doe.pdf`; blank names → `Resume.pdf`.
///
/// Whitespace runs collapse to a single `_` and characters that are not valid in
/// file names are dropped.
pub fn export_file_name(full_name: &str) -> String {
    let stem = full_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        format!("{FALLBACK_STEM}.pdf")
    } else {
        format!("{stem}.pdf")
    }
}

/// Lays out and serializes the document in memory. Returns the bytes and the
/// page count.
pub fn render_pdf(doc: &ResumeDocument, style: &StyleConfig) -> Result<(Vec<u8>, usize), AppError> {
    let config = default_page_config();
    let pages = layout_document(doc, style, config);
    let writer = PdfDocumentWriter::new(config.width_mm, config.height_mm);

    let name = doc.personal_info.full_name.trim();
    let meta = DocumentMeta {
        title: if name.is_empty() {
            FALLBACK_STEM.to_string()
        } else {
            format!("{name} - {FALLBACK_STEM}")
        },
        author: name.to_string(),
    };
    let bytes = writer.write(&pages, &meta)?;
    debug!(backend = writer.backend_name(), pages = pages.len(), "Document rendered");
    Ok((bytes, pages.len()))
}

/// Renders the document and saves it under `out_dir`, named after the person.
///
/// Missing required fields are reported and logged but never block the export.
pub fn export(doc: &ResumeDocument, style: &StyleConfig, out_dir: &Path) -> Result<ExportReport, AppError> {
    let completeness = compute_completeness_report(doc);
    if !completeness.missing_required.is_empty() {
        warn!(
            missing = ?completeness.missing_required,
            "Exporting with required fields empty"
        );
    }

    let (bytes, pages) = render_pdf(doc, style)?;

    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(export_file_name(&doc.personal_info.full_name));
    std::fs::write(&path, &bytes)?;

    info!(
        path = %path.display(),
        pages,
        bytes = bytes.len(),
        accent = %style.accent.0,
        "Resume exported"
    );

    Ok(ExportReport {
        path,
        pages,
        bytes: bytes.len(),
        missing_required: completeness.missing_required,
    })
}
