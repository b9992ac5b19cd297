use std::panic;

use super::ExtractionError;

/// Extracts the text layer of the whole document, pages in order.
///
/// pdf-extract panics on some malformed inputs instead of returning an error,
/// so the call is unwound here and reported as a parse failure.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractionError::Pdf("PDF parser aborted on malformed input".to_string()))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    tracing::debug!(bytes = bytes.len(), chars = text.len(), "Parsed PDF");

    Ok(text)
}
