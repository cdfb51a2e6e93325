// src/recommendation/mod.rs
//! Transcript-to-recommendation pipeline: prompt contract, completion
//! provider, and response parsing.

pub mod completion;
pub mod parser;
pub mod pipeline;
pub mod prompt;

pub use completion::{CompletionProvider, OpenAiCompletionClient};
pub use parser::parse_response;
pub use pipeline::RecommendationPipeline;
pub use prompt::{build_prompt, PromptText};
