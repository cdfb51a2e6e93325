// src/error.rs
//! Error taxonomy shared by every user-facing operation.
//!
//! Each variant maps to one failing step of a flow so callers can tell a
//! corrupt PDF from a failed upload or an unreachable provider without
//! inspecting message text.

use thiserror::Error;

/// The PDF could not be read. Distinct from upload and network failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("not a readable PDF document: {0}")]
    InvalidDocument(String),

    #[error("could not read file: {0}")]
    Unreadable(String),

    #[error("failed to read page {page}: {reason}")]
    Page { page: u32, reason: String },

    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

#[derive(Error, Debug, Clone)]
pub enum CareerMatchError {
    #[error("Reading failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Storage error: {0}")]
    Persistence(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Analysis service error: {0}")]
    Completion(String),

    #[error("No transcript text found. Please upload your transcript PDF first.")]
    MissingProfile,
}

impl CareerMatchError {
    /// Message shown to the user in place of the result.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Short machine-readable tag, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "extraction",
            Self::Upload(_) => "upload",
            Self::Persistence(_) => "persistence",
            Self::Search(_) => "search",
            Self::Completion(_) => "completion",
            Self::MissingProfile => "missing_profile",
        }
    }
}

impl From<sqlx::Error> for CareerMatchError {
    fn from(e: sqlx::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

/// Failure of a recommendation request. Kept apart from `AnalysisResult`
/// so a report can never be confused with an error string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No transcript text found. Please upload your transcript PDF first.")]
    MissingProfile,

    #[error("Could not load profile: {0}")]
    Persistence(String),

    #[error("Analysis service error: {0}")]
    Completion(String),
}

impl From<AnalysisError> for CareerMatchError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::MissingProfile => Self::MissingProfile,
            AnalysisError::Persistence(msg) => Self::Persistence(msg),
            AnalysisError::Completion(msg) => Self::Completion(msg),
        }
    }
}

pub type CareerResult<T> = Result<T, CareerMatchError>;
