/// Plain-text extraction from uploaded files.
///
/// The rest of the crate never looks at file formats: it receives the text
/// an extractor produced, or nothing if extraction failed.
mod formats;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::UploadedDocument;
use crate::scan::ScanWarning;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("document contains no text")]
    Empty,
}

/// Produces the plain-text content of a document.
pub trait DocumentExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Extractor dispatching on file extension: txt/md, pdf, docx, html.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl FileExtractor {
    /// Checks if a file extension is supported
    pub fn is_supported_extension(ext: &str) -> bool {
        matches!(
            ext.to_ascii_lowercase().as_str(),
            "txt" | "md" | "pdf" | "docx" | "html" | "htm"
        )
    }
}

impl DocumentExtractor for FileExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let text = match ext.as_str() {
            "txt" | "md" => std::fs::read_to_string(path)?,
            "pdf" => formats::pdf_text(path)?,
            "docx" => formats::docx_text(&std::fs::read(path)?)?,
            "html" | "htm" => formats::html_text(&std::fs::read_to_string(path)?),
            other => return Err(ExtractionError::Unsupported(other.to_string())),
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(text)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Extracts every path, skipping the ones that fail.
///
/// Each skipped file is reported as a [`ScanWarning::DocumentSkipped`].
pub fn extract_documents(
    extractor: &dyn DocumentExtractor,
    paths: &[PathBuf],
) -> (Vec<UploadedDocument>, Vec<ScanWarning>) {
    let mut documents = Vec::new();
    let mut warnings = Vec::new();

    for path in paths {
        let name = display_name(path);
        match extractor.extract_text(path) {
            Ok(text) => {
                info!("Extracted {} chars from {name}", text.chars().count());
                documents.push(UploadedDocument { name, text });
            }
            Err(e) => {
                warn!("Skipping document {name}: {e}");
                warnings.push(ScanWarning::DocumentSkipped {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    (documents, warnings)
}
