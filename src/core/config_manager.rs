// src/core/config_manager.rs
//! Unified configuration: file-based paths plus service endpoints from the
//! process environment.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::core::FsOps;
use crate::environment::EnvironmentConfig;

const DEFAULT_JOB_SEARCH_URL: &str = "https://linkedin-job-search-api.p.rapidapi.com";
const DEFAULT_JOB_SEARCH_HOST: &str = "linkedin-job-search-api.p.rapidapi.com";
const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub job_search: JobSearchConfig,
    pub completion: CompletionConfig,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct JobSearchConfig {
    pub base_url: String,
    pub api_host: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let service = Self::load_service()?;

        Ok(Self {
            environment,
            service,
        })
    }

    /// Load service configuration
    fn load_service() -> Result<ServiceConfig> {
        let timeout_seconds = match std::env::var("SERVICE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("SERVICE_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let service = ServiceConfig {
            job_search: JobSearchConfig {
                base_url: env_or("JOB_SEARCH_API_URL", DEFAULT_JOB_SEARCH_URL),
                api_host: env_or("JOB_SEARCH_API_HOST", DEFAULT_JOB_SEARCH_HOST),
                api_key: env_secret("RAPID_API_KEY"),
            },
            completion: CompletionConfig {
                base_url: env_or("COMPLETION_API_URL", DEFAULT_COMPLETION_URL),
                model: env_or("COMPLETION_MODEL", DEFAULT_COMPLETION_MODEL),
                api_key: env_secret("OPENAI_API_KEY"),
            },
            timeout_seconds,
        };

        Ok(service)
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        FsOps::ensure_dir_exists(&self.environment.blob_storage_path).await?;

        if let Some(db_parent) = self.environment.database_path.parent() {
            FsOps::ensure_dir_exists(db_parent).await?;
        }

        Ok(())
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Endpoints and model for the startup log. Keys are never included.
    pub fn summary(&self) -> String {
        format!(
            "job search at {}, completion model {} at {}, timeout {}s",
            self.job_search.base_url,
            self.completion.model,
            self.completion.base_url,
            self.timeout_seconds
        )
    }
}

impl JobSearchConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("RAPID_API_KEY environment variable not set")
    }
}

impl CompletionConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("OPENAI_API_KEY environment variable not set")
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
