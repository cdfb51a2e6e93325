// src/profile/mod.rs
//! Per-user record, saved postings and transcript blobs.
//!
//! Each backend sits behind a trait so services receive explicitly
//! constructed clients and tests can substitute fakes.

use async_trait::async_trait;

use crate::error::CareerResult;
use crate::types::{Department, JobPosting, UserId, UserProfile};

pub mod blob_store;
pub mod saved_jobs;
pub mod service;
pub mod sqlite_store;

pub use blob_store::LocalBlobStore;
pub use saved_jobs::SavedJobs;
pub use service::ProfileService;
pub use sqlite_store::SqliteStore;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, uid: &UserId) -> CareerResult<Option<UserProfile>>;

    /// Writes department id, name and email together, creating the record
    /// when absent. Other fields are left untouched.
    async fn set_department(
        &self,
        uid: &UserId,
        email: Option<&str>,
        department: &Department,
    ) -> CareerResult<()>;

    /// Writes URL and text in a single write; readers never observe one
    /// without the other.
    async fn set_transcript(&self, uid: &UserId, url: &str, text: &str) -> CareerResult<()>;

    /// `None` clears the supplement.
    async fn set_extra_info(&self, uid: &UserId, extra_info: Option<&str>) -> CareerResult<()>;
}

#[async_trait]
pub trait SavedJobStore: Send + Sync {
    /// Insert or replace by posting id.
    async fn upsert(&self, uid: &UserId, posting: &JobPosting) -> CareerResult<()>;

    /// Returns whether a posting was removed.
    async fn remove(&self, uid: &UserId, job_id: &str) -> CareerResult<bool>;

    async fn list(&self, uid: &UserId) -> CareerResult<Vec<JobPosting>>;

    async fn contains(&self, uid: &UserId, job_id: &str) -> CareerResult<bool>;
}

#[async_trait]
pub trait DepartmentCatalog: Send + Sync {
    async fn list_departments(&self) -> CareerResult<Vec<Department>>;

    async fn get_department(&self, id: &str) -> CareerResult<Option<Department>>;

    async fn add_department(&self, department: &Department) -> CareerResult<()>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `object_path` and returns a retrievable URL.
    async fn put(&self, object_path: &str, bytes: &[u8]) -> CareerResult<String>;
}
