// src/recommendation/prompt.rs
//! Prompt contract with the completion provider.
//!
//! The labels below are what [`super::parser`] relies on; changing one side
//! without the other breaks score extraction.

pub const SYSTEM_INSTRUCTION: &str =
    "You are a senior human resources and technical recruitment specialist.";

pub const CAREER_ADVISOR_INSTRUCTION: &str =
    "You are a friendly and expert career advisor guiding university students.";

pub const NO_SUPPLEMENT_SENTINEL: &str =
    "No supplementary information; evaluate from the academic record alone.";

pub const SCORE_LABEL: &str = "SCORE:";

pub const REPORT_SECTIONS: [&str; 5] = [
    "TITLE: CAREER COMPATIBILITY REPORT",
    "SECTION 1: GENERAL EVALUATION",
    "SECTION 2: MATCHING QUALIFICATIONS",
    "SECTION 3: GAPS AND DEVELOPMENT AREAS",
    "SECTION 4: CAREER RECOMMENDATION",
];

pub const CAREER_REPORT_SECTIONS: [&str; 3] =
    ["STRENGTHS", "DEVELOPMENT AREAS", "SUITABLE CAREER PATHS"];

/// Prompt text sent as the user message. Opaque to everything but the
/// provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptText(String);

impl PromptText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Compatibility prompt for one job description. `profile_text` must be
/// non-empty; the pipeline checks that before calling.
pub fn build_prompt(profile_text: &str, supplement: &str, job_description: &str) -> PromptText {
    let supplement = if supplement.trim().is_empty() {
        NO_SUPPLEMENT_SENTINEL
    } else {
        supplement.trim()
    };

    let prompt = format!(
        r#"TASK:
Analyze the job posting below against the candidate's profile (academic transcript plus the candidate's own supplementary statement).

JOB POSTING:
{job}

STUDENT TRANSCRIPT:
{profile}

CANDIDATE SUPPLEMENTARY STATEMENT (experience, projects):
{supplement}

OUTPUT FORMAT (USE EXACTLY THIS FORMAT):
{score} [an integer between 0 and 100, digits only]

{title}

{s1}
(A professional summary that weighs both the academic record and any additional experience.)

{s2}
(Which courses, grades and experiences fit the requirements of this job?)

{s3}

{s4}

NOTE: Do NOT use markdown emphasis markers (** or *) or heading markers (#). Write headings in capital letters."#,
        job = job_description.trim(),
        profile = profile_text.trim(),
        supplement = supplement,
        score = SCORE_LABEL,
        title = REPORT_SECTIONS[0],
        s1 = REPORT_SECTIONS[1],
        s2 = REPORT_SECTIONS[2],
        s3 = REPORT_SECTIONS[3],
        s4 = REPORT_SECTIONS[4],
    );

    PromptText(prompt)
}

/// Transcript-only career report prompt.
pub fn build_career_report_prompt(profile_text: &str) -> PromptText {
    let [strengths, development, paths] = CAREER_REPORT_SECTIONS;
    PromptText(format!(
        r#"TASK:
Analyze the transcript below and write a motivating report tailored to the student.

REPORT FORMAT:
1. {strengths}
2. {development}
3. {paths} (exactly 3)

Do NOT use markdown emphasis markers (** or *) or heading markers (#).

TRANSCRIPT:
{profile}"#,
        profile = profile_text.trim(),
    ))
}
