// src/recommendation/completion.rs
use anyhow::Result;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config_manager::CompletionConfig;
use crate::core::{ServiceClient, ServiceError};

/// A language model behind a request/response text API.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, ServiceError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ServiceError::Decode("completion returned no content".to_string()))
    }
}

/// OpenAI-compatible chat completions client.
pub struct OpenAiCompletionClient {
    client: ServiceClient,
    api_key: String,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: &CompletionConfig, timeout: std::time::Duration) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = ServiceClient::new(&config.base_url, timeout)?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
        })
    }

    fn build_request(&self, system: &str, prompt: &str) -> RequestBuilder {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        self.client
            .post("chat/completions")
            .bearer_auth(&self.api_key)
            .json(&body)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ServiceError> {
        info!(
            "Sending completion request to {} (model {}, {} prompt chars)",
            self.client.base_url(),
            self.model,
            prompt.chars().count()
        );

        let response: ChatResponse = self
            .client
            .send_json(self.build_request(system, prompt))
            .await?;
        let text = response.into_text()?;

        info!("Completion received ({} chars)", text.chars().count());
        Ok(text)
    }
}
