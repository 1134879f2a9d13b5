use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

mod client;
mod error;
pub mod prompt;
mod schema;

pub use client::ModelClient;
pub use error::AIError;
pub use schema::{ExplainInput, ExplainOutput, TranslateInput, TranslateOutput};

/// A text-generation backend: one prompt in, one reply out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AIError>;
}

/// Turns a natural-language request into a single shell command.
#[derive(Clone)]
pub struct Translator {
    model: Arc<dyn LanguageModel>,
}

impl Translator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn translate(&self, input: &TranslateInput) -> Result<TranslateOutput, AIError> {
        let reply = self.model
            .generate(prompt::TRANSLATE_SYSTEM, &prompt::translate(input))
            .await?;
        let mut output: TranslateOutput = decode(&reply, "command")?;
        output.command = output.command.trim().to_string();
        Ok(output)
    }
}

/// Describes what a shell command does.
#[derive(Clone)]
pub struct Explainer {
    model: Arc<dyn LanguageModel>,
}

impl Explainer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn explain(&self, input: &ExplainInput) -> Result<ExplainOutput, AIError> {
        let reply = self.model
            .generate(prompt::EXPLAIN_SYSTEM, &prompt::explain(input))
            .await?;
        decode(&reply, "explanation")
    }
}

/// Pulls the reply object out of `text`, deserializes it and checks its shape.
fn decode<T>(text: &str, required_field: &str) -> Result<T, AIError>
where
    T: DeserializeOwned + Validate,
{
    let json_text = extract_json(text, required_field)?;
    let value: T = serde_json::from_str(&json_text)
        .map_err(|e| AIError::ParseError(format!(
            "Failed to parse reply JSON: {} - Response text: {}",
            e, json_text
        )))?;
    value.validate().map_err(|e| AIError::ValidationError(
        format!("Response validation failed: {}", e)
    ))?;
    Ok(value)
}

/// Finds the first balanced JSON object in `text` that carries `required_field`.
pub fn extract_json(text: &str, required_field: &str) -> Result<String, AIError> {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        let mut brace_count = 0;
        let mut in_string = false;
        let mut escape_next = false;
        let mut end = None;

        for (i, c) in text[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' if !in_string => brace_count += 1,
                '}' if !in_string => {
                    brace_count -= 1;
                    if brace_count == 0 {
                        end = Some(start + i);
                        break;
                    }
                }
                _ => {}
            }
        }

        let Some(end) = end else { break };
        let candidate = &text[start..=end];
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(candidate) {
            if parsed.get(required_field).is_some() {
                return Ok(candidate.to_string());
            }
        }
        search_from = start + 1;
    }

    Err(AIError::ParseError(format!(
        "Could not find a JSON object with a \"{}\" field. Response text: {}",
        required_field,
        text.chars().take(200).collect::<String>()
    )))
}
