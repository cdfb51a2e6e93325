// src/job_search/types.rs
use serde::Serialize;

use crate::error::{CareerMatchError, CareerResult};

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_OFFSET: u32 = 0;

pub const BLANK_QUERY_MESSAGE: &str = "Please enter a job title and location.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSearchQuery {
    pub title: String,
    pub location: String,
    pub limit: u32,
    pub offset: u32,
}

impl JobSearchQuery {
    /// Rejects blank title or location before anything reaches the network.
    pub fn new(title: &str, location: &str) -> CareerResult<Self> {
        let title = title.trim();
        let location = location.trim();
        if title.is_empty() || location.is_empty() {
            return Err(CareerMatchError::Search(BLANK_QUERY_MESSAGE.to_string()));
        }

        Ok(Self {
            title: title.to_string(),
            location: location.to_string(),
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        })
    }

    pub fn with_page(mut self, limit: Option<u32>, offset: Option<u32>) -> Self {
        if let Some(limit) = limit.filter(|l| *l > 0) {
            self.limit = limit;
        }
        if let Some(offset) = offset {
            self.offset = offset;
        }
        self
    }

    pub(crate) fn as_params(&self) -> SearchParams<'_> {
        SearchParams {
            title_filter: &self.title,
            location_filter: &self.location,
            description_type: "text",
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Query string of the job search endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct SearchParams<'a> {
    pub title_filter: &'a str,
    pub location_filter: &'a str,
    pub description_type: &'static str,
    pub limit: u32,
    pub offset: u32,
}
