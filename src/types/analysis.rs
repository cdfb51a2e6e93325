// src/types/analysis.rs
use serde::{Deserialize, Serialize};

/// Parsed compatibility report. Held only in transient state, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Always within 0..=100.
    pub score: u8,
    /// Report body with the score line and emphasis markers removed.
    pub sections: String,
}

impl AnalysisResult {
    pub fn band(&self) -> MatchBand {
        MatchBand::from_score(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchBand {
    Strong,
    Moderate,
    Weak,
}

impl MatchBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => Self::Strong,
            40..=69 => Self::Moderate,
            _ => Self::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "strong match",
            Self::Moderate => "moderate match",
            Self::Weak => "weak match",
        }
    }
}
