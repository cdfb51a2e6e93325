// src/job_search/mod.rs
//! Third-party job search: query validation, provider client, service.

pub mod client;
pub mod service;
pub mod types;

pub use client::{JobSearchProvider, RapidApiJobSearch};
pub use service::JobSearchService;
pub use types::JobSearchQuery;
