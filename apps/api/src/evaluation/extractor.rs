//! PDF text extraction.

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF could not be parsed: {0}")]
    Corrupt(String),

    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

/// Concatenates the text of every page, in page order, with no separator.
///
/// Pages without a text layer (scans, images) or whose content fails to decode
/// contribute an empty string. Only a document that cannot be loaded at all is
/// an error.
pub fn extract_text(pdf: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(pdf).map_err(|e| ExtractionError::Corrupt(e.to_string()))?;

    let mut text = String::new();
    for page_num in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => debug!("page {page_num} has no extractable text: {e}"),
        }
    }

    Ok(text)
}
