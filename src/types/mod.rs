// src/types/mod.rs
pub mod analysis;
pub mod job_posting;
pub mod profile;

pub use analysis::{AnalysisResult, MatchBand};
pub use job_posting::JobPosting;
pub use profile::{Department, Session, UserId, UserProfile};
