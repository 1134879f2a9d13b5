// src/shell.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Interpreter used to run commands on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    PowerShell,
    Cmd,
}

impl ShellType {
    pub fn detect() -> Self {
        if cfg!(windows) {
            // Check if running in PowerShell
            if let Ok(shell_name) = env::var("PSModulePath") {
                if !shell_name.is_empty() {
                    return ShellType::PowerShell;
                }
            }
            // Default to CMD on Windows if not PowerShell
            ShellType::Cmd
        } else {
            // Default to the POSIX shell on Unix-like systems
            ShellType::Bash
        }
    }

    pub fn get_shell_command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            ShellType::Bash => ("sh", &["-c"]),
            ShellType::PowerShell => ("powershell", &["-NoProfile", "-Command"]),
            ShellType::Cmd => ("cmd", &["/C"]),
        }
    }

    /// Human-readable interpreter name shown in the interactive banner.
    pub fn get_shell_name(&self) -> &'static str {
        match self {
            ShellType::Bash => "POSIX shell (sh)",
            ShellType::PowerShell => "PowerShell",
            ShellType::Cmd => "Command Prompt",
        }
    }

    /// First line written to a hand-off script.
    pub fn script_directive(&self) -> &'static str {
        match self {
            ShellType::Bash => "#!/bin/sh",
            ShellType::PowerShell => "# cmdcraft",
            ShellType::Cmd => "@echo off",
        }
    }

    /// Line that keeps a script's window open until the user has read the output.
    pub fn pause_idiom(&self) -> &'static str {
        match self {
            ShellType::Bash => "read -r _",
            ShellType::PowerShell => "Read-Host -Prompt 'Press Enter to continue'",
            ShellType::Cmd => "pause",
        }
    }

    pub fn line_ending(&self) -> &'static str {
        match self {
            ShellType::Bash => "\n",
            ShellType::PowerShell | ShellType::Cmd => "\r\n",
        }
    }
}

/// Operating system a generated command is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum TargetOs {
    #[default]
    Linux,
    #[serde(rename = "macOS")]
    #[value(name = "macos")]
    MacOs,
    Windows,
}

impl TargetOs {
    pub fn detect() -> Self {
        if cfg!(windows) {
            TargetOs::Windows
        } else if cfg!(target_os = "macos") {
            TargetOs::MacOs
        } else {
            TargetOs::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Linux => "Linux",
            TargetOs::MacOs => "macOS",
            TargetOs::Windows => "Windows",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetOs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linux" => Ok(TargetOs::Linux),
            "macos" | "mac" | "osx" => Ok(TargetOs::MacOs),
            "windows" | "win" => Ok(TargetOs::Windows),
            other => Err(format!("Unsupported operating system: {}", other)),
        }
    }
}

pub fn is_dangerous_command(command: &str, dangerous_patterns: &[String], shell_type: &ShellType) -> bool {
    let command_lower = command.to_lowercase();

    // Common dangerous patterns across all shells
    let common_dangerous = dangerous_patterns.iter()
        .any(|pattern| command_lower.contains(&pattern.to_lowercase()));

    // Shell-specific dangerous patterns
    let shell_specific_dangerous = match shell_type {
        ShellType::PowerShell => {
            command_lower.contains("remove-item") && command_lower.contains("-recurse") ||
                command_lower.contains("format-volume") ||
                command_lower.contains("stop-computer")
        },
        ShellType::Cmd => {
            command_lower.contains("rmdir /s") ||
                command_lower.contains("format ") ||
                command_lower.contains("del /f")
        },
        ShellType::Bash => false  // Already covered by common patterns
    };

    common_dangerous || shell_specific_dangerous
}
