// src/transcript/mod.rs
pub mod extractor;
pub mod service;

pub use extractor::{extract_text, extract_text_blocking, ExtractedText};
pub use service::{TranscriptService, TranscriptStatus, UploadOutcome};
