// src/recommendation/pipeline.rs
use std::sync::Arc;
use tracing::{error, info, warn};

use super::completion::CompletionProvider;
use super::parser::{parse_response, strip_emphasis};
use super::prompt::{
    build_career_report_prompt, build_prompt, CAREER_ADVISOR_INSTRUCTION, SYSTEM_INSTRUCTION,
};
use crate::error::AnalysisError;
use crate::profile::ProfileStore;
use crate::types::{AnalysisResult, UserId};

/// Transcript text plus optional supplement, as loaded for one request.
struct StoredProfile {
    transcript_text: String,
    extra_info: String,
}

pub struct RecommendationPipeline {
    profiles: Arc<dyn ProfileStore>,
    provider: Arc<dyn CompletionProvider>,
}

impl RecommendationPipeline {
    pub fn new(profiles: Arc<dyn ProfileStore>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { profiles, provider }
    }

    /// Compatibility report between the stored profile and a job description.
    pub async fn analyze(
        &self,
        uid: &UserId,
        job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        info!("Starting compatibility analysis for user {}", uid);
        let profile = self.load_profile(uid).await?;
        self.analyze_text(&profile.transcript_text, &profile.extra_info, job_description)
            .await
    }

    /// Same contract as [`Self::analyze`] with the profile supplied directly.
    /// Empty `profile_text` never reaches the provider.
    pub async fn analyze_text(
        &self,
        profile_text: &str,
        supplement: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        if profile_text.trim().is_empty() {
            warn!("Analysis requested without transcript text");
            return Err(AnalysisError::MissingProfile);
        }

        let prompt = build_prompt(profile_text, supplement, job_description);
        let raw = self
            .provider
            .complete(SYSTEM_INSTRUCTION, prompt.as_str())
            .await
            .map_err(|e| {
                error!("Completion request failed: {}", e);
                AnalysisError::Completion(e.to_string())
            })?;

        let result = parse_response(&raw);
        info!(
            "Analysis completed with score {} ({})",
            result.score,
            result.band().label()
        );
        Ok(result)
    }

    /// Transcript-only career report (strengths, development areas, three
    /// suitable career paths), emphasis markers removed.
    pub async fn career_report(&self, uid: &UserId) -> Result<String, AnalysisError> {
        info!("Starting career report for user {}", uid);
        let profile = self.load_profile(uid).await?;

        let prompt = build_career_report_prompt(&profile.transcript_text);
        let raw = self
            .provider
            .complete(CAREER_ADVISOR_INSTRUCTION, prompt.as_str())
            .await
            .map_err(|e| {
                error!("Career report request failed: {}", e);
                AnalysisError::Completion(e.to_string())
            })?;

        Ok(strip_emphasis(&raw).trim().to_string())
    }

    async fn load_profile(&self, uid: &UserId) -> Result<StoredProfile, AnalysisError> {
        let profile = self
            .profiles
            .load(uid)
            .await
            .map_err(|e| AnalysisError::Persistence(e.to_string()))?
            .unwrap_or_default();

        if !profile.has_transcript() {
            warn!("No transcript text stored for user {}", uid);
            return Err(AnalysisError::MissingProfile);
        }

        Ok(StoredProfile {
            extra_info: profile.extra_info_or_empty().to_string(),
            transcript_text: profile.transcript_text.unwrap_or_default(),
        })
    }
}
