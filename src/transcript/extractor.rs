// src/transcript/extractor.rs
//! PDF text extraction.
//!
//! Text is concatenated page by page in document order; layout and columns
//! are not preserved. There is no OCR: a scanned, image-only transcript
//! comes back empty or nearly so and is flagged through
//! [`ExtractedText::is_effectively_empty`] instead of being treated as an
//! error.

use lopdf::Document;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ExtractionError;

/// Below this many non-whitespace characters a document is treated as
/// having no usable text layer.
const MIN_MEANINGFUL_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
    /// Pages whose content stream could not be decoded and were skipped.
    pub skipped_pages: Vec<u32>,
}

impl ExtractedText {
    pub fn is_effectively_empty(&self) -> bool {
        self.text.chars().filter(|c| !c.is_whitespace()).count() < MIN_MEANINGFUL_CHARS
    }
}

/// Synchronous extraction. CPU-bound: call through
/// [`extract_text_blocking`] from async code.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let document =
        Document::load_mem(bytes).map_err(|e| ExtractionError::InvalidDocument(e.to_string()))?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(ExtractionError::InvalidDocument(
            "document has no pages".to_string(),
        ));
    }

    let mut text = String::new();
    let mut skipped_pages = Vec::new();
    let mut last_error = None;

    // get_pages is keyed by page number, so iteration follows document order
    for page_number in pages.keys().copied() {
        match document.extract_text(&[page_number]) {
            Ok(page_text) => {
                let page_text = page_text.trim_end();
                if !page_text.is_empty() {
                    text.push_str(page_text);
                    text.push('\n');
                }
            }
            Err(e) => {
                warn!("Skipping unreadable PDF page {}: {}", page_number, e);
                skipped_pages.push(page_number);
                last_error = Some((page_number, e.to_string()));
            }
        }
    }

    if skipped_pages.len() == pages.len() {
        let (page, reason) = last_error.unwrap_or((0, "no readable pages".to_string()));
        return Err(ExtractionError::Page { page, reason });
    }

    debug!(
        "Extracted {} characters from {} pages",
        text.len(),
        pages.len()
    );

    Ok(ExtractedText {
        text,
        page_count: pages.len(),
        skipped_pages,
    })
}

/// Runs [`extract_text`] on the blocking pool.
pub async fn extract_text_blocking(bytes: Arc<[u8]>) -> Result<ExtractedText, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))?
}
