use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;

use cmdcraft::ai::ModelClient;
use cmdcraft::cli::{Cli, CliCommand, HistoryAction, RunArgs, SavedAction};
use cmdcraft::config::{self, Config};
use cmdcraft::executor::{CommandExecutor, HandoffFile};
use cmdcraft::export::default_export_dir;
use cmdcraft::logging;
use cmdcraft::orchestrator::{ExecuteRequest, Orchestrator};
use cmdcraft::render::Renderer;
use cmdcraft::repl::Repl;
use cmdcraft::session::{ExplanationForm, SaveCommandForm, Session, TranslationForm};
use cmdcraft::shell::{is_dangerous_command, ShellType};
use cmdcraft::store::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::get_config_path()?,
    };
    let config = Config::load_or_create(&config_path)?;

    logging::init(&config.display.log_level, cli.verbose);
    if cli.no_color || !config.display.color_output {
        colored::control::set_override(false);
    }

    let session = build_session(&config)?;
    let renderer = Renderer::new(config.display.theme.clone());

    let Some(command) = cli.command else {
        let export_dir = default_export_dir();
        let mut repl = Repl::new(
            &session,
            &renderer,
            config.execution.default_os,
            &config.execution.dangerous_commands,
            &export_dir,
        );
        return repl.run().await;
    };

    match command {
        CliCommand::Translate { query, os } => {
            let form = TranslationForm {
                query: query.join(" "),
                operating_system: os.unwrap_or(config.execution.default_os),
            };
            let output = session.translate(form).await?;
            renderer.command(&output.command);
        }
        CliCommand::Explain { command } => {
            let output = session.explain(ExplanationForm { command: command.join(" ") }).await?;
            renderer.explanation(&output.explanation);
        }
        CliCommand::Run(RunArgs { command, handoff }) => {
            let request = if handoff {
                ExecuteRequest::Handoff
            } else if command.is_empty() {
                return Err(anyhow!("Give a command to run, or pass --handoff"));
            } else {
                let command = command.join(" ");
                let shell = session.orchestrator().shell();
                if is_dangerous_command(&command, &config.execution.dangerous_commands, &shell) {
                    tracing::warn!(%command, "running command that matches a dangerous pattern");
                    renderer.warning("Warning: this command matches a dangerous pattern.");
                }
                ExecuteRequest::Command(command)
            };
            let output = session.run(request).await?;
            renderer.execution(&output);
        }
        CliCommand::History { page, action } => match action {
            Some(HistoryAction::Clear) => {
                session.clear_history().await?;
                renderer.notice("History cleared.");
            }
            None => {
                let page = session.history_page(page.saturating_sub(1)).await?;
                renderer.history_page(&page);
            }
        },
        CliCommand::Saved { action } => match action {
            SavedAction::List => renderer.saved_commands(&session.saved_commands().await?),
            SavedAction::Add { command, description } => {
                let saved = session.save_command(SaveCommandForm { command, description }).await?;
                renderer.notice(&format!("Command saved! ({})", saved.id));
            }
            SavedAction::Delete { id } => {
                if session.delete_saved(id).await? {
                    renderer.notice("Command deleted.");
                } else {
                    return Err(anyhow!("No saved command with id {}", id));
                }
            }
        },
        CliCommand::Export { command, dir } => {
            let dir = dir.unwrap_or_else(default_export_dir);
            let path = session.export(&command.join(" "), &dir).await?;
            renderer.notice(&format!("Saved to {}", path.display()));
        }
    }

    Ok(())
}

fn build_session(config: &Config) -> Result<Session> {
    let model = ModelClient::new(config.ai.clone())?;
    let shell = ShellType::detect();

    let mut orchestrator = Orchestrator::new(Arc::new(model), CommandExecutor::new(shell));
    let handoff = &config.execution.handoff;
    if handoff.enabled {
        orchestrator = orchestrator
            .with_handoff(HandoffFile::new(handoff.path.clone(), shell).with_pause(handoff.pause));
    }

    let store = FileStore::new(config.data_dir()?);
    tracing::debug!(path = %store.path().display(), "using data directory");

    Ok(Session::new(orchestrator, Arc::new(store), config.storage.page_size))
}
