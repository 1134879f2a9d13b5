//! Form and view behaviors of the front end, independent of any terminal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::ai::{ExplainInput, ExplainOutput, TranslateInput, TranslateOutput};
use crate::executor::ExecutionOutput;
use crate::export;
use crate::orchestrator::{ActionResult, ExecuteRequest, Orchestrator};
use crate::shell::TargetOs;
use crate::store::{paginate, CommandEntry, HistoryLog, KeyValueStore, SavedCommand, SavedLibrary};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Action(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Validate)]
pub struct TranslationForm {
    #[validate(length(min = 10, message = "Please enter a more descriptive query."))]
    pub query: String,
    pub operating_system: TargetOs,
}

#[derive(Debug, Clone, Validate)]
pub struct ExplanationForm {
    #[validate(length(min = 2, message = "Please enter a command to explain."))]
    pub command: String,
}

#[derive(Debug, Clone, Validate)]
pub struct SaveCommandForm {
    #[validate(length(min = 2, message = "Please enter a command."))]
    pub command: String,
    #[validate(length(min = 5, message = "Please enter a short description."))]
    pub description: String,
}

/// A page of history ready for display.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub entries: Vec<CommandEntry>,
    pub index: usize,
    pub total_pages: usize,
    pub total_entries: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

pub struct Session {
    orchestrator: Orchestrator,
    history: HistoryLog,
    saved: SavedLibrary,
    page_size: usize,
}

impl Session {
    pub fn new(orchestrator: Orchestrator, store: Arc<dyn KeyValueStore>, page_size: usize) -> Self {
        Self {
            orchestrator,
            history: HistoryLog::new(Arc::clone(&store)),
            saved: SavedLibrary::new(store),
            page_size: page_size.max(1),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub async fn translate(&self, form: TranslationForm) -> Result<TranslateOutput, SessionError> {
        check(&form)?;
        let input = TranslateInput {
            natural_language_query: form.query.trim().to_string(),
            operating_system: form.operating_system,
        };

        let output = settle(self.orchestrator.translate(input.clone()).await)?;
        let entry = CommandEntry::translation(input, output.command.clone());
        if let Err(e) = self.history.record(entry).await {
            warn!(error = %e, "could not record translation in history");
        }
        Ok(output)
    }

    pub async fn explain(&self, form: ExplanationForm) -> Result<ExplainOutput, SessionError> {
        check(&form)?;
        let input = ExplainInput {
            command: form.command.trim().to_string(),
        };

        let output = settle(self.orchestrator.explain(input.clone()).await)?;
        let entry = CommandEntry::explanation(input, output.explanation.clone());
        if let Err(e) = self.history.record(entry).await {
            warn!(error = %e, "could not record explanation in history");
        }
        Ok(output)
    }

    /// Runs a command; the output is shown once and never stored.
    pub async fn run(&self, request: ExecuteRequest) -> Result<ExecutionOutput, SessionError> {
        settle(self.orchestrator.execute(request).await)
    }

    pub async fn history(&self) -> Result<Vec<CommandEntry>, SessionError> {
        Ok(self.history.entries().await?)
    }

    pub async fn history_page(&self, page: usize) -> Result<HistoryPage, SessionError> {
        let entries = self.history.entries().await?;
        let view = paginate(&entries, self.page_size, page);

        Ok(HistoryPage {
            entries: view.items.to_vec(),
            index: view.index,
            total_pages: view.total_pages,
            total_entries: entries.len(),
            has_previous: view.has_previous(),
            has_next: view.has_next(),
        })
    }

    pub async fn clear_history(&self) -> Result<(), SessionError> {
        Ok(self.history.clear().await?)
    }

    pub async fn saved_commands(&self) -> Result<Vec<SavedCommand>, SessionError> {
        Ok(self.saved.entries().await?)
    }

    pub async fn save_command(&self, form: SaveCommandForm) -> Result<SavedCommand, SessionError> {
        check(&form)?;
        let saved = SavedCommand::new(form.command.trim(), form.description.trim());
        self.saved.add(saved.clone()).await?;
        Ok(saved)
    }

    pub async fn delete_saved(&self, id: Uuid) -> Result<bool, SessionError> {
        Ok(self.saved.remove(id).await?)
    }

    pub async fn export(&self, command: &str, dir: &Path) -> Result<PathBuf, SessionError> {
        if command.trim().is_empty() {
            return Err(SessionError::Invalid("Nothing to export.".to_string()));
        }
        Ok(export::export_command(command, dir).await?)
    }
}

fn check(form: &impl Validate) -> Result<(), SessionError> {
    form.validate().map_err(|errors| {
        let messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .map(|err| match &err.message {
                Some(message) => message.to_string(),
                None => err.code.to_string(),
            })
            .collect();
        SessionError::Invalid(messages.join(" "))
    })
}

fn settle<T>(result: ActionResult<T>) -> Result<T, SessionError> {
    result.into_result().map_err(SessionError::Action)
}
