// src/types/profile.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity subject issued by the identity provider. The app never
/// authenticates on its own; it only scopes records by this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(uid: impl Into<String>) -> Option<Self> {
        let uid = uid.into();
        let trimmed = uid.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user as seen by the screens.
#[derive(Debug, Clone)]
pub struct Session {
    pub uid: UserId,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub id: String,
    pub name: String,
}

/// One record per identity. Writes are last-write-wins with no version
/// check; two devices writing the same account clobber each other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: Option<String>,
    pub department_id: Option<String>,
    pub department_name: Option<String>,
    pub transcript_url: Option<String>,
    pub transcript_text: Option<String>,
    pub extra_info: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Non-empty transcript text means an upload has completed.
    pub fn has_transcript(&self) -> bool {
        self.transcript_text
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }

    /// Supplement text, empty when never set.
    pub fn extra_info_or_empty(&self) -> &str {
        self.extra_info.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::new("   ").is_none());
        assert_eq!(UserId::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_has_transcript() {
        let mut profile = UserProfile::default();
        assert!(!profile.has_transcript());
        profile.transcript_text = Some("  \n".to_string());
        assert!(!profile.has_transcript());
        profile.transcript_text = Some("Algorithms AA".to_string());
        assert!(profile.has_transcript());
    }
}
