// src/job_search/service.rs
use std::sync::Arc;
use tracing::{error, info};

use super::client::JobSearchProvider;
use super::types::JobSearchQuery;
use crate::error::{CareerMatchError, CareerResult};
use crate::types::JobPosting;

pub struct JobSearchService {
    provider: Arc<dyn JobSearchProvider>,
}

impl JobSearchService {
    pub fn new(provider: Arc<dyn JobSearchProvider>) -> Self {
        Self { provider }
    }

    /// Validates input, then performs one provider call. Nothing is retried.
    pub async fn search(
        &self,
        title: &str,
        location: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> CareerResult<Vec<JobPosting>> {
        let query = JobSearchQuery::new(title, location)?.with_page(limit, offset);
        self.run(&query).await
    }

    pub async fn run(&self, query: &JobSearchQuery) -> CareerResult<Vec<JobPosting>> {
        match self.provider.search(query).await {
            Ok(postings) => {
                info!(
                    "Search '{}' / '{}' returned {} postings",
                    query.title,
                    query.location,
                    postings.len()
                );
                Ok(postings)
            }
            Err(e) => {
                error!("Job search failed: {}", e);
                Err(CareerMatchError::Search(e.to_string()))
            }
        }
    }
}
