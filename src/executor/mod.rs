//! Runs commands on the host shell.
//!
//! Commands are passed to the interpreter verbatim. There is no validation,
//! escaping, allow-list, sandbox, timeout or cancellation: whatever string
//! reaches [`CommandExecutor::run`] executes with the privileges of the
//! current user.

pub mod handoff;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::shell::ShellType;
pub use handoff::HandoffFile;

/// Captured streams of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Outcome of one executor call. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    Completed(ExecutionOutput),
    Failed { message: String },
}

impl Execution {
    pub fn failed(message: impl Into<String>) -> Self {
        Execution::Failed { message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Execution::Completed(_))
    }

    /// Collapses the outcome into the `{ stdout, stderr }` shape; a failure
    /// becomes empty stdout with the message on stderr.
    pub fn into_output(self) -> ExecutionOutput {
        match self {
            Execution::Completed(output) => output,
            Execution::Failed { message } => ExecutionOutput {
                stdout: String::new(),
                stderr: message,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandExecutor {
    shell: ShellType,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(ShellType::detect())
    }
}

impl CommandExecutor {
    pub fn new(shell: ShellType) -> Self {
        Self { shell }
    }

    pub fn shell(&self) -> ShellType {
        self.shell
    }

    pub async fn run(&self, command: &str) -> Execution {
        let (shell, args) = self.shell.get_shell_command();

        if let Err(e) = which::which(shell) {
            return Execution::failed(format!("Interpreter '{}' not found: {}", shell, e));
        }

        debug!(shell, command, "spawning");
        let output = match Command::new(shell).args(args).arg(command).output().await {
            Ok(output) => output,
            Err(e) => {
                warn!(shell, error = %e, "failed to spawn command");
                return Execution::failed(format!("Failed to execute command '{}': {}", command, e));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            debug!(status = %output.status, "command failed");
            let mut message = format!("Command failed ({}): {}", output.status, command);
            if !stderr.trim().is_empty() {
                message.push('\n');
                message.push_str(stderr.trim_end());
            }
            return Execution::failed(message);
        }

        Execution::Completed(ExecutionOutput { stdout, stderr })
    }

    /// Runs whatever command the hand-off file holds right now.
    pub async fn run_handoff(&self, file: &HandoffFile) -> Execution {
        match file.read_command().await {
            Ok(command) => self.run(&command).await,
            Err(e) => {
                warn!(path = %file.path().display(), error = %e, "hand-off file unusable");
                Execution::failed(format!("{:#}", e))
            }
        }
    }
}

pub async fn execute_command(command: &str) -> ExecutionOutput {
    CommandExecutor::default().run(command).await.into_output()
}
