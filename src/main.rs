use anyhow::{Context, Result};
use career_match::cli::{self, Cli};
use career_match::core::ConfigManager;
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Log path comes from the configuration file
    let config = ConfigManager::load()?;

    let file = open_log_file(&config.environment.log_path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Invalid log directive")?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();

    info!(
        "careermatch starting (environment: {})",
        career_match::environment::EnvironmentConfig::get_environment()
    );
    info!(
        "Database: {}",
        config.environment.database_path.display()
    );
    info!(
        "Blob storage: {}",
        config.environment.blob_storage_path.display()
    );
    info!("Service configuration: {}", config.service.summary());

    cli::run(cli, config).await
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
