// src/types/job_posting.rs
//! Job postings as returned by the search provider.
//!
//! The provider is not contract-bound: any field except the id may be
//! missing, null, or of an unexpected JSON type. Deserialization never
//! fails on those fields; presentation substitutes placeholders instead.
//! Entries without a usable id are dropped from a result list.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

pub const COMPANY_PLACEHOLDER: &str = "Confidential";
pub const LOCATION_PLACEHOLDER: &str = "Remote";
pub const DESCRIPTION_PLACEHOLDER: &str = "No description available.";
pub const TITLE_PLACEHOLDER: &str = "Untitled position";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,

    #[serde(
        rename = "organization",
        alias = "company_name",
        default,
        deserialize_with = "lenient_text"
    )]
    pub company_name: Option<String>,

    #[serde(
        rename = "url",
        alias = "job_url",
        default,
        deserialize_with = "lenient_text"
    )]
    pub job_url: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub location: Option<String>,

    #[serde(
        rename = "description_text",
        alias = "description",
        default,
        deserialize_with = "lenient_text"
    )]
    pub description_text: Option<String>,
}

impl JobPosting {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            company_name: None,
            job_url: None,
            location: None,
            description_text: None,
        }
    }

    pub fn title_display(&self) -> &str {
        self.title.as_deref().unwrap_or(TITLE_PLACEHOLDER)
    }

    pub fn company_display(&self) -> &str {
        self.company_name.as_deref().unwrap_or(COMPANY_PLACEHOLDER)
    }

    pub fn location_display(&self) -> &str {
        self.location.as_deref().unwrap_or(LOCATION_PLACEHOLDER)
    }

    /// Parse a provider result list entry by entry, skipping entries that
    /// cannot identify a posting.
    pub fn from_values(values: Vec<Value>) -> Vec<JobPosting> {
        values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(posting) => Some(posting),
                Err(e) => {
                    warn!("Skipping job posting at index {}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    /// Description handed to the recommendation pipeline.
    pub fn description_or_placeholder(&self) -> &str {
        self.description_text
            .as_deref()
            .unwrap_or(DESCRIPTION_PLACEHOLDER)
    }
}

fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "job posting id must be a string or number, got {}",
            other
        ))),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(value_to_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_use_placeholders() {
        let posting: JobPosting = serde_json::from_str(r#"{"id": "X"}"#).unwrap();
        assert_eq!(posting.id, "X");
        assert_eq!(posting.company_display(), "Confidential");
        assert_eq!(posting.location_display(), "Remote");
        assert_eq!(posting.title_display(), TITLE_PLACEHOLDER);
        assert_eq!(posting.description_or_placeholder(), DESCRIPTION_PLACEHOLDER);

        // Serializing and reading back an all-empty posting stays intact
        let json = serde_json::to_string(&posting).unwrap();
        let back: JobPosting = serde_json::from_str(&json).unwrap();
        assert_eq!(back, posting);
    }

    #[test]
    fn test_provider_field_names() {
        let body = r#"[{
            "id": "1893",
            "title": "Backend Engineer",
            "organization": "Acme",
            "url": "https://example.com/jobs/1893",
            "location": "Istanbul",
            "description_text": "Python, SQL"
        }]"#;
        let postings: Vec<JobPosting> = serde_json::from_str(body).unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].company_display(), "Acme");
        assert_eq!(postings[0].job_url.as_deref(), Some("https://example.com/jobs/1893"));
        assert_eq!(postings[0].description_or_placeholder(), "Python, SQL");
    }

    #[test]
    fn test_unexpected_types_do_not_fault() {
        let body = r#"{
            "id": 42,
            "title": null,
            "organization": {"name": "nested"},
            "location": ["Ankara", "Remote"],
            "description_text": ""
        }"#;
        let posting: JobPosting = serde_json::from_str(body).unwrap();
        assert_eq!(posting.id, "42");
        assert_eq!(posting.title, None);
        assert_eq!(posting.company_name, None);
        assert_eq!(posting.location.as_deref(), Some("Ankara, Remote"));
        assert_eq!(posting.description_text, None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(serde_json::from_str::<JobPosting>(r#"{"title": "x"}"#).is_err());
    }

    #[test]
    fn test_list_keeps_valid_postings_when_one_lacks_id() {
        let body = r#"[
            {"id": "1", "title": "Backend Engineer"},
            {"title": "Data Analyst"},
            {"id": "", "title": "Blank id"},
            "not an object",
            {"id": 7, "organization": "Acme"}
        ]"#;
        let values: Vec<Value> = serde_json::from_str(body).unwrap();
        let postings = JobPosting::from_values(values);

        let ids: Vec<&str> = postings.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "7"]);
        assert_eq!(postings[0].title_display(), "Backend Engineer");
        assert_eq!(postings[1].company_display(), "Acme");
    }
}
