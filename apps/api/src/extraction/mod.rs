//! Document text extraction — turns an uploaded resume (PDF, DOCX, TXT) into plain text.
//!
//! All parsers are synchronous and CPU-bound; `extract_document` runs them on the
//! blocking pool so request handlers never stall the runtime.

pub mod docx;
pub mod pdf;
pub mod text;

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type '{0}'")]
    UnsupportedFormat(String),

    #[error("Error processing PDF: {0}")]
    Pdf(String),

    #[error("Error processing DOCX: {0}")]
    Docx(String),

    #[error("Error processing text file: {0}")]
    Encoding(String),

    #[error("The uploaded document contains no extractable text")]
    EmptyDocument,

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// The document formats the service can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Resolves the kind from the uploaded filename's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "txt" => Ok(DocumentKind::Txt),
            "" => Err(ExtractionError::UnsupportedFormat(filename.to_string())),
            other => Err(ExtractionError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }
}

/// Extracts plain text from `bytes` according to `kind`. Does not check for emptiness.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(bytes),
        DocumentKind::Docx => docx::extract_docx_text(bytes),
        DocumentKind::Txt => text::decode_text(bytes),
    }
}

/// Full upload path: validate the filename, extract off the async runtime, and
/// reject documents that yield no text.
pub async fn extract_document(filename: &str, bytes: Bytes) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_filename(filename)?;

    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))??;

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }

    tracing::info!(
        kind = kind.as_str(),
        chars = text.chars().count(),
        "Extracted document text"
    );

    Ok(text)
}
