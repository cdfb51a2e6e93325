// src/transcript/service.rs
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::extractor::{self, ExtractedText};
use crate::core::FsOps;
use crate::error::{CareerMatchError, CareerResult, ExtractionError};
use crate::profile::{BlobStore, ProfileStore};
use crate::types::UserId;
use crate::utils;

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub url: String,
    pub page_count: usize,
    pub characters: usize,
    /// No usable text layer (scanned document). The record is still
    /// written, but analysis will report a missing profile.
    pub image_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TranscriptStatus {
    pub url: Option<String>,
    pub has_text: bool,
    pub characters: usize,
}

/// Transcript upload flow: extract, store the blob, then write URL and
/// text to the profile together.
pub struct TranscriptService {
    profiles: Arc<dyn ProfileStore>,
    blobs: Arc<dyn BlobStore>,
}

/// One fresh object per upload; earlier uploads are orphaned, not reused.
pub fn transcript_object_path(uid: &UserId) -> String {
    format!(
        "transcripts/{}/{}.pdf",
        utils::encode_path_segment(uid.as_str()),
        Uuid::new_v4()
    )
}

impl TranscriptService {
    pub fn new(profiles: Arc<dyn ProfileStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { profiles, blobs }
    }

    pub async fn existing(&self, uid: &UserId) -> CareerResult<TranscriptStatus> {
        let Some(profile) = self.profiles.load(uid).await? else {
            return Ok(TranscriptStatus::default());
        };

        let characters = profile
            .transcript_text
            .as_deref()
            .map(|t| t.chars().count())
            .unwrap_or(0);
        Ok(TranscriptStatus {
            has_text: profile.has_transcript(),
            url: profile.transcript_url.filter(|url| !url.is_empty()),
            characters,
        })
    }

    pub async fn upload_file(&self, uid: &UserId, path: &Path) -> CareerResult<UploadOutcome> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        utils::validate_file_extension(&file_name, &["pdf"])
            .map_err(|e| ExtractionError::InvalidDocument(e.to_string()))?;

        let bytes = FsOps::read_bytes_safe(path)
            .await
            .map_err(|e| ExtractionError::Unreadable(format!("{:#}", e)))?;

        self.upload(uid, bytes).await
    }

    /// Extraction runs first so an unreadable document never reaches
    /// storage. The blob is then stored and the profile written once.
    pub async fn upload(&self, uid: &UserId, bytes: Vec<u8>) -> CareerResult<UploadOutcome> {
        info!("Transcript upload started for {} ({} bytes)", uid, bytes.len());

        let bytes: Arc<[u8]> = bytes.into();
        let extracted: ExtractedText = extractor::extract_text_blocking(bytes.clone())
            .await
            .map_err(|e| {
                error!("Transcript reading failed for {}: {}", uid, e);
                CareerMatchError::Extraction(e)
            })?;

        let object_path = transcript_object_path(uid);
        let url = self.blobs.put(&object_path, &bytes).await.map_err(|e| {
            error!("Transcript upload failed for {}: {}", uid, e);
            e
        })?;

        self.profiles
            .set_transcript(uid, &url, &extracted.text)
            .await
            .map_err(|e| {
                error!("Transcript record write failed for {}: {}", uid, e);
                e
            })?;

        if !extracted.skipped_pages.is_empty() {
            warn!(
                "Transcript for {} stored without unreadable pages {:?}",
                uid, extracted.skipped_pages
            );
        }

        let image_only = extracted.is_effectively_empty();
        if image_only {
            warn!(
                "Transcript for {} has no usable text layer ({} pages); OCR is not supported",
                uid, extracted.page_count
            );
        }

        info!("Transcript stored for {} at {}", uid, url);
        Ok(UploadOutcome {
            url,
            page_count: extracted.page_count,
            characters: extracted.text.chars().count(),
            image_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_pdf, MemoryStore};

    fn uid() -> UserId {
        UserId::new("student/1").unwrap()
    }

    #[test]
    fn test_object_path_is_fresh_and_namespaced() {
        let a = transcript_object_path(&uid());
        let b = transcript_object_path(&uid());
        assert!(a.starts_with("transcripts/student_2F1/"));
        assert!(a.ends_with(".pdf"));
        assert_ne!(a, b);

        let other = transcript_object_path(&UserId::new("student_1").unwrap());
        assert!(other.starts_with("transcripts/student_5F1/"));
    }

    #[tokio::test]
    async fn test_upload_writes_url_and_text_together() {
        let store = Arc::new(MemoryStore::default());
        let service = TranscriptService::new(store.clone(), store.clone());

        let pdf = sample_pdf(&["B.Sc. Computer Science", "Algorithms AA Databases BA"]);
        let outcome = service.upload(&uid(), pdf).await.unwrap();
        assert_eq!(outcome.page_count, 2);
        assert!(!outcome.image_only);

        let status = service.existing(&uid()).await.unwrap();
        assert_eq!(status.url.as_deref(), Some(outcome.url.as_str()));
        assert!(status.has_text);
        assert_eq!(store.blob_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_pdf_aborts_before_profile_write() {
        let store = Arc::new(MemoryStore::default());
        let service = TranscriptService::new(store.clone(), store.clone());

        let err = service
            .upload(&uid(), b"not a pdf".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, CareerMatchError::Extraction(_)));
        assert_eq!(store.blob_count(), 0);

        let status = service.existing(&uid()).await.unwrap();
        assert!(status.url.is_none());
        assert!(!status.has_text);
    }

    #[tokio::test]
    async fn test_blob_failure_is_upload_error_and_keeps_prior_record() {
        let store = Arc::new(MemoryStore::default());
        let service = TranscriptService::new(store.clone(), store.clone());
        service
            .upload(&uid(), sample_pdf(&["First transcript upload, Calculus AA"]))
            .await
            .unwrap();
        let before = service.existing(&uid()).await.unwrap();

        store.fail_blob_writes(true);
        let err = service
            .upload(&uid(), sample_pdf(&["Second transcript upload, Physics BB"]))
            .await
            .unwrap_err();
        assert!(matches!(err, CareerMatchError::Upload(_)));

        let after = service.existing(&uid()).await.unwrap();
        assert_eq!(after.url, before.url);
    }

    #[tokio::test]
    async fn test_image_only_document_is_flagged() {
        let store = Arc::new(MemoryStore::default());
        let service = TranscriptService::new(store.clone(), store.clone());

        let outcome = service.upload(&uid(), sample_pdf(&[""])).await.unwrap();
        assert!(outcome.image_only);
        assert!(!service.existing(&uid()).await.unwrap().has_text);
    }

    #[tokio::test]
    async fn test_upload_file_rejects_non_pdf_extension() {
        let store = Arc::new(MemoryStore::default());
        let service = TranscriptService::new(store.clone(), store.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.docx");
        std::fs::write(&path, b"PK").unwrap();

        let err = service.upload_file(&uid(), &path).await.unwrap_err();
        assert!(matches!(
            err,
            CareerMatchError::Extraction(ExtractionError::InvalidDocument(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_file_reads_from_disk() {
        let store = Arc::new(MemoryStore::default());
        let service = TranscriptService::new(store.clone(), store.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.pdf");
        std::fs::write(&path, sample_pdf(&["Linear Algebra AA, Statistics BA"])).unwrap();

        let outcome = service.upload_file(&uid(), &path).await.unwrap();
        assert!(outcome.characters > 0);

        let missing = dir.path().join("missing.pdf");
        let err = service.upload_file(&uid(), &missing).await.unwrap_err();
        assert!(matches!(
            err,
            CareerMatchError::Extraction(ExtractionError::Unreadable(_))
        ));
    }
}
