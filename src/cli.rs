use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

use crate::shell::TargetOs;

#[derive(Debug, Parser)]
#[command(name = "cmdcraft", version, about = "Turn plain-language requests into shell commands")]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Generate a command from a natural-language request
    Translate {
        #[arg(required = true)]
        query: Vec<String>,
        /// Operating system the command is for
        #[arg(long, value_enum)]
        os: Option<TargetOs>,
    },
    /// Explain what a command does
    Explain {
        #[arg(required = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Run a command on this machine (no sandbox; it runs as you)
    Run(RunArgs),
    /// Show or clear the history of generated and explained commands
    History {
        /// Page to show, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Manage the saved-commands library
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Write a command to Command.bat in the download folder
    Export {
        #[arg(required = true, allow_hyphen_values = true)]
        command: Vec<String>,
        /// Directory to write into
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(allow_hyphen_values = true, conflicts_with = "handoff")]
    pub command: Vec<String>,
    /// Run the command recorded in the hand-off file
    #[arg(long)]
    pub handoff: bool,
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// Delete every history entry
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum SavedAction {
    /// List saved commands
    List,
    /// Save a command with a description
    Add {
        #[arg(allow_hyphen_values = true)]
        command: String,
        #[arg(long, short)]
        description: String,
    },
    /// Delete a saved command by id
    Delete { id: Uuid },
}
