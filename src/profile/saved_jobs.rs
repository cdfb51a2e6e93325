// src/profile/saved_jobs.rs
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use super::SavedJobStore;
use crate::error::CareerResult;
use crate::types::{JobPosting, UserId};

/// Favourite postings, unique by id.
pub struct SavedJobs {
    store: Arc<dyn SavedJobStore>,
}

impl SavedJobs {
    pub fn new(store: Arc<dyn SavedJobStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, uid: &UserId, posting: &JobPosting) -> CareerResult<()> {
        self.store.upsert(uid, posting).await?;
        info!("Saved job {} for user {}", posting.id, uid);
        Ok(())
    }

    pub async fn remove(&self, uid: &UserId, job_id: &str) -> CareerResult<bool> {
        let removed = self.store.remove(uid, job_id).await?;
        if removed {
            info!("Removed saved job {} for user {}", job_id, uid);
        }
        Ok(removed)
    }

    /// Saves when absent, removes when present. Returns whether the posting
    /// is saved afterwards.
    pub async fn toggle(&self, uid: &UserId, posting: &JobPosting) -> CareerResult<bool> {
        if self.store.contains(uid, &posting.id).await? {
            self.remove(uid, &posting.id).await?;
            Ok(false)
        } else {
            self.save(uid, posting).await?;
            Ok(true)
        }
    }

    pub async fn list(&self, uid: &UserId) -> CareerResult<Vec<JobPosting>> {
        self.store.list(uid).await
    }

    /// Ids used to mark favourites in search results.
    pub async fn saved_ids(&self, uid: &UserId) -> CareerResult<HashSet<String>> {
        Ok(self
            .store
            .list(uid)
            .await?
            .into_iter()
            .map(|posting| posting.id)
            .collect())
    }
}
