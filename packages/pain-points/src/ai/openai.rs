//! OpenAI implementation of the [`Extractor`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use pain_points::ai::OpenAiExtractor;
//!
//! let extractor = OpenAiExtractor::from_env()?.with_model("gpt-4o");
//! let analyzer = BatchAnalyzer::new(store, threads, extractor);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::ai::parse::parse_extraction_response;
use crate::ai::prompts::{system_prompt, user_prompt};
use crate::error::{PainPointError, Result};
use crate::traits::extractor::Extractor;
use crate::types::{candidate::ExtractedPainPoint, thread::ExtractionInput};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Extractor backed by the OpenAI chat completions API in JSON mode.
///
/// The API key is held as a secret and redacted from `Debug` output.
#[derive(Debug)]
pub struct OpenAiExtractor {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiExtractor {
    /// Create a new extractor with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from `OPENAI_API_KEY`, honoring `OPENAI_MODEL` when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| PainPointError::Config("OPENAI_API_KEY not set".into()))?;
        let extractor = Self::new(api_key);
        Ok(match std::env::var("OPENAI_MODEL") {
            Ok(model) if !model.trim().is_empty() => extractor.with_model(model),
            _ => extractor,
        })
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(PainPointError::extraction)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PainPointError::extraction(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(PainPointError::extraction)?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PainPointError::extraction("No response from OpenAI"))
    }
}

impl Clone for OpenAiExtractor {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: SecretString::from(self.api_key.expose_secret().to_owned()),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

#[async_trait]
impl Extractor for OpenAiExtractor {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, input), fields(model = %self.model, title = %input.title))]
    async fn extract(&self, input: &ExtractionInput) -> Result<Vec<ExtractedPainPoint>> {
        let raw = self.chat(&system_prompt(), &user_prompt(input)).await?;
        let pain_points =
            parse_extraction_response(&raw).map_err(PainPointError::extraction)?;
        debug!(count = pain_points.len(), "Extraction response parsed");
        Ok(pain_points)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
