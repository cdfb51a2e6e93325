// src/profile/sqlite_store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{DepartmentCatalog, ProfileStore, SavedJobStore};
use crate::core::Database;
use crate::error::CareerResult;
use crate::types::{Department, JobPosting, UserId, UserProfile};

pub struct SqliteStore {
    db: Database,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    email: Option<String>,
    department_id: Option<String>,
    department_name: Option<String>,
    transcript_url: Option<String>,
    transcript_text: Option<String>,
    extra_info: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            email: row.email,
            department_id: row.department_id,
            department_name: row.department_name,
            transcript_url: row.transcript_url,
            transcript_text: row.transcript_text,
            extra_info: row.extra_info,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostingRow {
    id: String,
    title: Option<String>,
    company_name: Option<String>,
    job_url: Option<String>,
    location: Option<String>,
    description_text: Option<String>,
}

impl From<PostingRow> for JobPosting {
    fn from(row: PostingRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            company_name: row.company_name,
            job_url: row.job_url,
            location: row.location,
            description_text: row.description_text,
        }
    }
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Replace the user's last search results.
    pub async fn cache_search_results(
        &self,
        uid: &UserId,
        postings: &[JobPosting],
    ) -> CareerResult<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM search_results WHERE uid = ?")
            .bind(uid.as_str())
            .execute(&mut *tx)
            .await?;

        for (position, posting) in postings.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO search_results
                    (uid, position, id, title, company_name, job_url, location, description_text)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(uid.as_str())
            .bind(position as i64)
            .bind(&posting.id)
            .bind(&posting.title)
            .bind(&posting.company_name)
            .bind(&posting.job_url)
            .bind(&posting.location)
            .bind(&posting.description_text)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("Cached {} search results for {}", postings.len(), uid);
        Ok(())
    }

    pub async fn cached_search_results(&self, uid: &UserId) -> CareerResult<Vec<JobPosting>> {
        let rows = sqlx::query_as::<_, PostingRow>(
            r#"
            SELECT id, title, company_name, job_url, location, description_text
            FROM search_results
            WHERE uid = ?
            ORDER BY position ASC
            "#,
        )
        .bind(uid.as_str())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    /// Look a posting up among saved jobs first, then the last search.
    pub async fn find_posting(
        &self,
        uid: &UserId,
        job_id: &str,
    ) -> CareerResult<Option<JobPosting>> {
        let saved = sqlx::query_as::<_, PostingRow>(
            r#"
            SELECT id, title, company_name, job_url, location, description_text
            FROM saved_jobs
            WHERE uid = ? AND id = ?
            "#,
        )
        .bind(uid.as_str())
        .bind(job_id)
        .fetch_optional(self.db.pool())
        .await?;

        if let Some(row) = saved {
            return Ok(Some(row.into()));
        }

        let cached = sqlx::query_as::<_, PostingRow>(
            r#"
            SELECT id, title, company_name, job_url, location, description_text
            FROM search_results
            WHERE uid = ? AND id = ?
            "#,
        )
        .bind(uid.as_str())
        .bind(job_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(cached.map(JobPosting::from))
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn load(&self, uid: &UserId) -> CareerResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT email, department_id, department_name, transcript_url,
                   transcript_text, extra_info, updated_at
            FROM users
            WHERE uid = ?
            "#,
        )
        .bind(uid.as_str())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn set_department(
        &self,
        uid: &UserId,
        email: Option<&str>,
        department: &Department,
    ) -> CareerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (uid, email, department_id, department_name, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(uid) DO UPDATE SET
                email = COALESCE(excluded.email, users.email),
                department_id = excluded.department_id,
                department_name = excluded.department_name,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(uid.as_str())
        .bind(email)
        .bind(&department.id)
        .bind(&department.name)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        info!("Department {} saved for user {}", department.id, uid);
        Ok(())
    }

    async fn set_transcript(&self, uid: &UserId, url: &str, text: &str) -> CareerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (uid, transcript_url, transcript_text, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(uid) DO UPDATE SET
                transcript_url = excluded.transcript_url,
                transcript_text = excluded.transcript_text,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(uid.as_str())
        .bind(url)
        .bind(text)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        info!("Transcript record updated for user {}", uid);
        Ok(())
    }

    async fn set_extra_info(&self, uid: &UserId, extra_info: Option<&str>) -> CareerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (uid, extra_info, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(uid) DO UPDATE SET
                extra_info = excluded.extra_info,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(uid.as_str())
        .bind(extra_info)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SavedJobStore for SqliteStore {
    async fn upsert(&self, uid: &UserId, posting: &JobPosting) -> CareerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO saved_jobs
                (uid, id, title, company_name, job_url, location, description_text, saved_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(uid, id) DO UPDATE SET
                title = excluded.title,
                company_name = excluded.company_name,
                job_url = excluded.job_url,
                location = excluded.location,
                description_text = excluded.description_text
            "#,
        )
        .bind(uid.as_str())
        .bind(&posting.id)
        .bind(&posting.title)
        .bind(&posting.company_name)
        .bind(&posting.job_url)
        .bind(&posting.location)
        .bind(&posting.description_text)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn remove(&self, uid: &UserId, job_id: &str) -> CareerResult<bool> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE uid = ? AND id = ?")
            .bind(uid.as_str())
            .bind(job_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, uid: &UserId) -> CareerResult<Vec<JobPosting>> {
        let rows = sqlx::query_as::<_, PostingRow>(
            r#"
            SELECT id, title, company_name, job_url, location, description_text
            FROM saved_jobs
            WHERE uid = ?
            ORDER BY saved_at ASC, id ASC
            "#,
        )
        .bind(uid.as_str())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn contains(&self, uid: &UserId, job_id: &str) -> CareerResult<bool> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT id FROM saved_jobs WHERE uid = ? AND id = ?")
                .bind(uid.as_str())
                .bind(job_id)
                .fetch_optional(self.db.pool())
                .await?;

        Ok(found.is_some())
    }
}

#[async_trait]
impl DepartmentCatalog for SqliteStore {
    async fn list_departments(&self) -> CareerResult<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name ASC")
                .fetch_all(self.db.pool())
                .await?;
        Ok(departments)
    }

    async fn get_department(&self, id: &str) -> CareerResult<Option<Department>> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments WHERE id = ?")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;
        Ok(department)
    }

    async fn add_department(&self, department: &Department) -> CareerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO departments (id, name) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name
            "#,
        )
        .bind(&department.id)
        .bind(&department.name)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
