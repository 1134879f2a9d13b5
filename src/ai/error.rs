use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AIError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
    #[error("Rate limit error: {0}")]
    RateLimitError(String),
    #[error("API error: {0}")]
    APIError(String),
}

impl From<JsonError> for AIError {
    fn from(error: JsonError) -> Self {
        AIError::ParseError(format!("JSON serialization error: {}", error))
    }
}

impl From<reqwest::Error> for AIError {
    fn from(error: reqwest::Error) -> Self {
        AIError::NetworkError(error.to_string())
    }
}
