use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::shell::ShellType;

/// Script file that carries the most recently produced command to a later,
/// argument-less execution.
#[derive(Debug, Clone)]
pub struct HandoffFile {
    path: PathBuf,
    shell: ShellType,
    pause: bool,
}

impl HandoffFile {
    pub fn new(path: impl Into<PathBuf>, shell: ShellType) -> Self {
        Self {
            path: path.into(),
            shell,
            pause: false,
        }
    }

    /// Append the shell's pause idiom after the command.
    pub fn with_pause(mut self, pause: bool) -> Self {
        self.pause = pause;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(&self, command: &str) -> String {
        let eol = self.shell.line_ending();
        let mut script = String::new();
        script.push_str(self.shell.script_directive());
        script.push_str(eol);
        for line in command.trim().lines() {
            script.push_str(line);
            script.push_str(eol);
        }
        if self.pause {
            script.push_str(self.shell.pause_idiom());
            script.push_str(eol);
        }
        script
    }

    /// Replaces the file contents with a script wrapping `command`.
    pub async fn write(&self, command: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, self.render(command))
            .await
            .with_context(|| format!("Failed to write hand-off file {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "hand-off file updated");
        Ok(())
    }

    /// Reads the file fresh and returns the command body without the
    /// interpreter directive or pause line.
    pub async fn read_command(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read hand-off file {}", self.path.display()))?;
        self.parse(&content)
    }

    fn parse(&self, content: &str) -> Result<String> {
        let mut lines: Vec<&str> = content.lines().map(|l| l.trim_end_matches('\r')).collect();

        if let Some(first) = lines.first() {
            let first = first.trim();
            if first.starts_with("#!") || first == self.shell.script_directive() {
                lines.remove(0);
            }
        }
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        if self.pause && lines.last().is_some_and(|l| l.trim() == self.shell.pause_idiom()) {
            lines.pop();
        }

        let command = lines.join("\n").trim().to_string();
        if command.is_empty() {
            return Err(anyhow!("Hand-off file {} holds no command", self.path.display()));
        }
        Ok(command)
    }
}
