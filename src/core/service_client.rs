// src/core/service_client.rs
//! Shared HTTP plumbing for the remote providers (job search, completion)

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, trace};

/// Longest slice of an error body kept in messages.
const MAX_ERROR_BODY: usize = 500;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned error status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client.get(self.url(endpoint))
    }

    pub fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client.post(self.url(endpoint))
    }

    /// Send a prepared request and decode a JSON body. Non-success statuses
    /// are returned with (a truncated copy of) the error body.
    pub async fn send_json<R>(&self, request: RequestBuilder) -> Result<R, ServiceError>
    where
        R: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(describe_transport_error(&e)))?;

        let status = response.status();
        trace!("Response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("Service error {}: {}", status, truncate_body(&body));
            return Err(ServiceError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str::<R>(&body).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("could not connect: {}", e)
    } else {
        e.to_string()
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "Unknown error".to_string();
    }
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
