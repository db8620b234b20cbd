//! Plain-text extraction for uploaded `.pdf`, `.docx` and `.txt` resumes.

mod docx;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Text file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Formats the extractor understands, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Extracts text from a `.pdf`, `.docx` or `.txt` file.
///
/// Unknown extensions produce an empty string without touching the file.
/// Runs on the blocking pool; a panic inside a format reader surfaces as
/// `ExtractionError::Task` instead of unwinding into the request.
pub async fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let Some(kind) = DocumentKind::from_path(path) else {
        return Ok(String::new());
    };
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || extract_blocking(&path, kind)).await?
}

fn extract_blocking(path: &Path, kind: DocumentKind) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string())),
        DocumentKind::Docx => docx::extract_text(&bytes),
        DocumentKind::PlainText => Ok(String::from_utf8(bytes)?),
    }
}
