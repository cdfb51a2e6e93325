// src/profile/blob_store.rs
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info};

use super::BlobStore;
use crate::core::FsOps;
use crate::error::{CareerMatchError, CareerResult};

/// Blob store rooted at a local directory; URLs are `file://` paths.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, object_path: &str) -> CareerResult<PathBuf> {
        let relative = Path::new(object_path);
        let is_clean = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if object_path.is_empty() || !is_clean {
            return Err(CareerMatchError::Upload(format!(
                "invalid object path: {}",
                object_path
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, object_path: &str, bytes: &[u8]) -> CareerResult<String> {
        let target = self.resolve(object_path)?;

        FsOps::write_bytes_atomic(&target, bytes).await.map_err(|e| {
            error!("Blob write failed for {}: {:#}", object_path, e);
            CareerMatchError::Upload(format!("{:#}", e))
        })?;

        info!("Stored blob {} ({} bytes)", object_path, bytes.len());
        Ok(FsOps::file_url(&target))
    }
}
