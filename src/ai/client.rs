use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{AIError, LanguageModel};
use crate::config::{AIConfig, AIProvider};

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const OPENAI_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the configured text-generation provider.
#[derive(Debug, Clone)]
pub struct ModelClient {
    config: AIConfig,
    http: reqwest::Client,
}

impl ModelClient {
    pub fn new(config: AIConfig) -> Result<Self, AIError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    fn endpoint(&self) -> String {
        let (default_base, path) = match self.config.provider {
            AIProvider::Anthropic => (ANTHROPIC_BASE_URL, "/v1/messages"),
            AIProvider::OpenAI => (OPENAI_BASE_URL, "/v1/chat/completions"),
        };
        let base = self.config.api_url.as_deref().unwrap_or(default_base);
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap, AIError> {
        let api_key = self.config.api_key().ok_or_else(|| {
            AIError::ValidationError(format!("{:?} API key not configured", self.config.provider))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        match self.config.provider {
            AIProvider::Anthropic => {
                headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
                headers.insert("x-api-key", HeaderValue::from_str(api_key)
                    .map_err(|e| AIError::ValidationError(format!("Invalid API key: {}", e)))?);
            }
            AIProvider::OpenAI => {
                headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .map_err(|e| AIError::ValidationError(format!("Invalid API key: {}", e)))?);
            }
        }
        Ok(headers)
    }

    fn body(&self, system: &str, prompt: &str) -> serde_json::Value {
        match self.config.provider {
            AIProvider::Anthropic => json!({
                "model": &self.config.model,
                "max_tokens": self.config.max_tokens,
                "system": system,
                "messages": [
                    { "role": "user", "content": prompt }
                ]
            }),
            AIProvider::OpenAI => json!({
                "model": &self.config.model,
                "max_tokens": self.config.max_tokens,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": prompt }
                ]
            }),
        }
    }

    fn extract_text(&self, response_text: &str) -> Result<String, AIError> {
        let text = match self.config.provider {
            AIProvider::Anthropic => {
                let response: AnthropicResponse = serde_json::from_str(response_text)
                    .map_err(|e| AIError::ParseError(format!(
                        "Failed to parse Anthropic response: {} - Raw response: {}",
                        e, response_text
                    )))?;
                response.content.into_iter().map(|c| c.text).collect::<Vec<_>>().join("")
            }
            AIProvider::OpenAI => {
                let response: OpenAIResponse = serde_json::from_str(response_text)
                    .map_err(|e| AIError::ParseError(format!(
                        "Failed to parse OpenAI response: {} - Raw response: {}",
                        e, response_text
                    )))?;
                response.choices.into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .unwrap_or_default()
            }
        };

        if text.trim().is_empty() {
            return Err(AIError::ParseError(format!("Empty response from model: {}", response_text)));
        }
        Ok(text)
    }
}

#[async_trait]
impl LanguageModel for ModelClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AIError> {
        let headers = self.headers()?;
        let endpoint = self.endpoint();
        debug!(%endpoint, model = %self.config.model, "sending prompt");

        let response = self.http
            .post(&endpoint)
            .headers(headers)
            .json(&self.body(system, prompt))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => (),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AIError::RateLimitError("Rate limit exceeded".to_string()));
            }
            StatusCode::UNAUTHORIZED => {
                return Err(AIError::AuthenticationError("Invalid API key".to_string()));
            }
            status => {
                let error_body = response.text().await
                    .unwrap_or_else(|_| "Could not read error response".to_string());
                return Err(AIError::APIError(format!(
                    "Unexpected status code: {} - Response: {}",
                    status, error_body
                )));
            }
        }

        let response_text = response.text().await
            .map_err(|e| AIError::NetworkError(format!("Failed to read response body: {}", e)))?;
        debug!(bytes = response_text.len(), "model replied");

        self.extract_text(&response_text)
    }
}
