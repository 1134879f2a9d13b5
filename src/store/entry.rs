use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::{ExplainInput, TranslateInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "nl-to-command")]
    Translation,
    #[serde(rename = "explain")]
    Explanation,
}

/// The request that produced a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryInput {
    Translation(TranslateInput),
    Explanation(ExplainInput),
}

impl EntryInput {
    /// Text a user typed for this entry: the query or the command.
    pub fn summary(&self) -> &str {
        match self {
            EntryInput::Translation(input) => &input.natural_language_query,
            EntryInput::Explanation(input) => &input.command,
        }
    }
}

/// One row of the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub input: EntryInput,
    pub output: String,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl CommandEntry {
    pub fn translation(input: TranslateInput, command: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: EntryKind::Translation,
            input: EntryInput::Translation(input),
            output: command.into(),
            created_at: Utc::now(),
        }
    }

    pub fn explanation(input: ExplainInput, explanation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: EntryKind::Explanation,
            input: EntryInput::Explanation(input),
            output: explanation.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCommand {
    pub id: Uuid,
    pub command: String,
    pub description: String,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl SavedCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: command.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}
