// src/core/fs_ops.rs
//! File system helpers shared by the blob store and configuration setup

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_bytes_safe(path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write to a temporary sibling then rename, so readers never see a
    /// partially written file.
    pub async fn write_bytes_atomic(path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        let tmp_path = path.with_extension("part");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).await.with_context(|| {
            format!(
                "Failed to move {} into place at {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        info!("Written file: {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    pub fn normalize_path(base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.join(relative)
        }
    }

    /// `file://` URL for a local path.
    pub fn file_url(path: &Path) -> String {
        format!("file://{}", path.display())
    }

    /// Inverse of `file_url`; `None` for any other scheme.
    pub fn path_from_file_url(url: &str) -> Option<PathBuf> {
        url.strip_prefix("file://").map(PathBuf::from)
    }
}
