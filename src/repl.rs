use anyhow::Result;
use colored::*;
use std::io::{self, Write};
use std::path::Path;

use crate::orchestrator::ExecuteRequest;
use crate::render::Renderer;
use crate::session::{ExplanationForm, SaveCommandForm, Session, SessionError, TranslationForm};
use crate::shell::{is_dangerous_command, TargetOs};

pub struct Repl<'a> {
    session: &'a Session,
    renderer: &'a Renderer,
    os: TargetOs,
    dangerous_patterns: &'a [String],
    export_dir: &'a Path,
}

impl<'a> Repl<'a> {
    pub fn new(
        session: &'a Session,
        renderer: &'a Renderer,
        os: TargetOs,
        dangerous_patterns: &'a [String],
        export_dir: &'a Path,
    ) -> Self {
        Self { session, renderer, os, dangerous_patterns, export_dir }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{}", "cmdcraft - describe a task, get a command".green().bold());
        println!("Target OS: {}", self.os.to_string().blue());
        println!("Runs in: {}", self.session.orchestrator().shell().get_shell_name().blue());
        println!("Type ':help' for commands, 'exit' to quit\n");

        loop {
            let Some(line) = prompt("cmdcraft> ")? else { break };
            let line = line.trim();

            match line {
                "" => continue,
                "exit" | "quit" | ":q" => break,
                ":help" => print_help(),
                _ if line == ":history" || line.starts_with(":history ") => {
                    match history_page_arg(&line[":history".len()..]) {
                        Ok(page) => match self.session.history_page(page).await {
                            Ok(page) => self.renderer.history_page(&page),
                            Err(e) => self.renderer.error(&e.to_string()),
                        },
                        Err(e) => self.renderer.error(&e),
                    }
                }
                ":saved" => match self.session.saved_commands().await {
                    Ok(saved) => self.renderer.saved_commands(&saved),
                    Err(e) => self.renderer.error(&e.to_string()),
                },
                _ if line.starts_with(":os ") => match line[4..].parse::<TargetOs>() {
                    Ok(os) => {
                        self.os = os;
                        self.renderer.notice(&format!("Target OS set to {}", os));
                    }
                    Err(e) => self.renderer.error(&e),
                },
                _ if line.starts_with(":explain ") => {
                    let command = line[9..].to_string();
                    self.explain(command).await;
                }
                _ if line.starts_with(":run ") => {
                    let command = line[5..].to_string();
                    self.execute(command).await;
                }
                query => self.translate(query).await?,
            }
        }

        Ok(())
    }

    async fn translate(&mut self, query: &str) -> Result<()> {
        let form = TranslationForm {
            query: query.to_string(),
            operating_system: self.os,
        };
        let command = match self.session.translate(form).await {
            Ok(output) => output.command,
            Err(e) => {
                self.report(e);
                return Ok(());
            }
        };
        self.renderer.command(&command);

        let choice = prompt("[r]un  [e]xplain  [s]ave  e[x]port  (enter to skip): ")?.unwrap_or_default();
        match choice.trim() {
            "r" => self.execute(command).await,
            "e" => self.explain(command).await,
            "s" => {
                let description = prompt("Description: ")?.unwrap_or_default();
                let form = SaveCommandForm { command, description };
                match self.session.save_command(form).await {
                    Ok(_) => self.renderer.notice("Command saved!"),
                    Err(e) => self.report(e),
                }
            }
            "x" => match self.session.export(&command, self.export_dir).await {
                Ok(path) => self.renderer.notice(&format!("Saved to {}", path.display())),
                Err(e) => self.report(e),
            },
            _ => {}
        }
        Ok(())
    }

    async fn explain(&self, command: String) {
        match self.session.explain(ExplanationForm { command }).await {
            Ok(output) => self.renderer.explanation(&output.explanation),
            Err(e) => self.report(e),
        }
    }

    async fn execute(&self, command: String) {
        let shell = self.session.orchestrator().shell();
        if is_dangerous_command(&command, self.dangerous_patterns, &shell) {
            tracing::warn!(%command, "running command that matches a dangerous pattern");
            self.renderer.warning("Warning: this command matches a dangerous pattern.");
        }
        match self.session.run(ExecuteRequest::Command(command)).await {
            Ok(output) => self.renderer.execution(&output),
            Err(e) => self.report(e),
        }
    }

    fn report(&self, error: SessionError) {
        self.renderer.error(&error.to_string());
    }
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Parses the optional one-based page number after `:history`.
fn history_page_arg(rest: &str) -> Result<usize, String> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(0);
    }
    match rest.parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page - 1),
        _ => Err(format!("Not a page number: {}", rest)),
    }
}

fn print_help() {
    println!("  <request>          generate a command for the request");
    println!("  :explain <command> explain a command");
    println!("  :run <command>     run a command");
    println!("  :os <name>         switch target OS (linux, macos, windows)");
    println!("  :history [page]    show history, one page at a time");
    println!("  :saved             show saved commands");
    println!("  exit               quit");
}
