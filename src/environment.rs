// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::FsOps;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub blob_storage_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

fn default_log_path() -> PathBuf {
    PathBuf::from("/tmp/careermatch.log")
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        Self::load_from_file(Path::new(CONFIG_FILE), &environment)
    }

    pub fn get_environment() -> String {
        std::env::var("CAREERMATCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "{} not found in current directory. Cannot start without configuration.",
                config_path.display()
            );
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml(&config_content, environment)
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        // Make paths absolute
        Ok(Self {
            database_path: Self::resolve_path(&env_config.database_path)?,
            blob_storage_path: Self::resolve_path(&env_config.blob_storage_path)?,
            log_path: Self::resolve_path(&env_config.log_path)?,
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(FsOps::normalize_path(&current_dir, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  database_path: data/careermatch.db
  blob_storage_path: data/blobs
production:
  database_path: /var/lib/careermatch/careermatch.db
  blob_storage_path: /var/lib/careermatch/blobs
  log_path: /var/log/careermatch.log
"#;

    #[test]
    fn test_selects_environment_section() {
        let prod = EnvironmentConfig::from_yaml(SAMPLE, "production").unwrap();
        assert_eq!(
            prod.database_path,
            PathBuf::from("/var/lib/careermatch/careermatch.db")
        );
        assert_eq!(prod.log_path, PathBuf::from("/var/log/careermatch.log"));

        let local = EnvironmentConfig::from_yaml(SAMPLE, "anything-else").unwrap();
        assert!(local.database_path.is_absolute());
        assert!(local.blob_storage_path.ends_with("data/blobs"));
        assert_eq!(local.log_path, default_log_path());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result =
            EnvironmentConfig::load_from_file(Path::new("/nonexistent/config.yaml"), "local");
        assert!(result.is_err());
    }
}
