// src/core/database.rs
//! SQLite-backed document store: connection management and schema

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

use crate::core::FsOps;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create new database connection with automatic setup
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!(
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database, mainly for tests. A single connection
    /// keeps every query on the same memory instance.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                uid TEXT PRIMARY KEY,
                email TEXT,
                department_id TEXT,
                department_name TEXT,
                transcript_url TEXT,
                transcript_text TEXT,
                extra_info TEXT,
                updated_at TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS departments (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS saved_jobs (
                uid TEXT NOT NULL,
                id TEXT NOT NULL,
                title TEXT,
                company_name TEXT,
                job_url TEXT,
                location TEXT,
                description_text TEXT,
                saved_at TEXT NOT NULL,
                PRIMARY KEY (uid, id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Last search per user, so a later command can refer to a posting by id
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS search_results (
                uid TEXT NOT NULL,
                position INTEGER NOT NULL,
                id TEXT NOT NULL,
                title TEXT,
                company_name TEXT,
                job_url TEXT,
                location TEXT,
                description_text TEXT,
                PRIMARY KEY (uid, id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_saved_jobs_uid ON saved_jobs(uid);")
            .execute(&self.pool)
            .await?;

        info!("Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}
