// src/recommendation/parser.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::AnalysisResult;

// Tolerates emphasis between the label and the number ("SCORE: **72**")
static SCORE_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SCORE:\s*\**\s*(\d+)").expect("valid score pattern"));

static SCORE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SCORE:.*").expect("valid score line pattern"));

/// Total: any input yields a result with a score in 0..=100.
pub fn parse_response(raw: &str) -> AnalysisResult {
    let score = extract_score(raw);
    let without_score = SCORE_LINE.replace_all(raw, "");
    let sections = strip_emphasis(&without_score).trim().to_string();

    AnalysisResult { score, sections }
}

/// Absent, overflowing or out-of-range scores become 0.
fn extract_score(raw: &str) -> u8 {
    SCORE_VALUE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|score| *score <= 100)
        .and_then(|score| u8::try_from(score).ok())
        .unwrap_or(0)
}

pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace('#', "")
}
