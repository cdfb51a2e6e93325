//! Transcript-based career matching.
//!
//! A student uploads an academic transcript PDF, picks a department, searches
//! recent job postings, and asks for a compatibility report between their
//! profile and a job description.

pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
pub mod job_search;
pub mod profile;
pub mod recommendation;
pub mod state;
pub mod transcript;
pub mod types;
pub mod utils;

#[cfg(test)]
mod testing;

pub use error::{AnalysisError, CareerMatchError, CareerResult, ExtractionError};
