// src/job_search/client.rs
use anyhow::Result;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::info;

use super::types::JobSearchQuery;
use crate::core::config_manager::JobSearchConfig;
use crate::core::{ServiceClient, ServiceError};
use crate::types::JobPosting;

const SEARCH_ENDPOINT: &str = "active-jb-7d";

#[async_trait]
pub trait JobSearchProvider: Send + Sync {
    async fn search(&self, query: &JobSearchQuery) -> Result<Vec<JobPosting>, ServiceError>;
}

/// LinkedIn job search through RapidAPI (postings from the last 7 days).
pub struct RapidApiJobSearch {
    client: ServiceClient,
    api_key: String,
    api_host: String,
}

impl RapidApiJobSearch {
    pub fn new(config: &JobSearchConfig, timeout: std::time::Duration) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = ServiceClient::new(&config.base_url, timeout)?;

        Ok(Self {
            client,
            api_key,
            api_host: config.api_host.clone(),
        })
    }

    fn build_request(&self, query: &JobSearchQuery) -> RequestBuilder {
        self.client
            .get(SEARCH_ENDPOINT)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .query(&query.as_params())
    }
}

#[async_trait]
impl JobSearchProvider for RapidApiJobSearch {
    async fn search(&self, query: &JobSearchQuery) -> Result<Vec<JobPosting>, ServiceError> {
        info!(
            "Searching jobs: '{}' in '{}' (limit {}, offset {})",
            query.title, query.location, query.limit, query.offset
        );

        let entries: Vec<Value> = self.client.send_json(self.build_request(query)).await?;
        let received = entries.len();
        let postings = JobPosting::from_values(entries);

        info!(
            "Job search returned {} postings ({} skipped)",
            postings.len(),
            received - postings.len()
        );
        Ok(postings)
    }
}
