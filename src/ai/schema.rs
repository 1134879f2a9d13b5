use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::shell::TargetOs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateInput {
    pub natural_language_query: String,
    pub operating_system: TargetOs,
}

/// Reply shape the model must produce for a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct TranslateOutput {
    /// The generated command-line command.
    #[validate(custom(function = "not_blank", message = "Command cannot be empty"))]
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainInput {
    pub command: String,
}

/// Reply shape the model must produce for an explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ExplainOutput {
    /// A clear, concise explanation of the command.
    #[validate(custom(function = "not_blank", message = "Explanation cannot be empty"))]
    pub explanation: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
