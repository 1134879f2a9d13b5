use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shell::TargetOs;
use crate::theme::Theme;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub ai: AIConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AIConfig {
    pub provider: AIProvider,
    pub model: String,
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    /// Base URL of an API compatible with the selected provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            provider: AIProvider::Anthropic,
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1024,
            timeout_secs: default_timeout_secs(),
            anthropic_api_key: None,
            openai_api_key: None,
            api_url: None,
        }
    }
}

impl AIConfig {
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.provider {
            AIProvider::Anthropic => self.anthropic_api_key.as_deref(),
            AIProvider::OpenAI => self.openai_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AIProvider {
    Anthropic,
    OpenAI,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub default_os: TargetOs,
    /// Patterns that trigger a warning before a command runs. Nothing is blocked.
    #[serde(default)]
    pub dangerous_commands: Vec<String>,
    #[serde(default)]
    pub handoff: HandoffConfig,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            default_os: TargetOs::detect(),
            dangerous_commands: vec![
                "rm -rf".to_string(),
                "sudo".to_string(),
                "mkfs".to_string(),
                "dd if=".to_string(),
            ],
            handoff: HandoffConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HandoffConfig {
    pub enabled: bool,
    pub path: PathBuf,
    #[serde(default)]
    pub pause: bool,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        let file_name = if cfg!(windows) {
            "last_command.bat"
        } else {
            "last_command.sh"
        };
        Self {
            enabled: false,
            path: PathBuf::from(file_name),
            pause: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    5
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    pub color_output: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            log_level: default_log_level(),
            theme: Theme::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    pub fn create_default(path: &Path) -> Result<Self> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the file at `path`, writing a default one first if it is missing,
    /// then layers API keys from the environment.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::info!(path = %path.display(), "creating default config");
            Self::create_default(path)?
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| env::var(name).ok());
    }

    /// Fills missing or blank API keys from `lookup`.
    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if is_blank(&self.ai.anthropic_api_key) {
            if let Some(key) = lookup("ANTHROPIC_API_KEY") {
                self.ai.anthropic_api_key = Some(key);
            }
        }
        if is_blank(&self.ai.openai_api_key) {
            if let Some(key) = lookup("OPENAI_API_KEY") {
                self.ai.openai_api_key = Some(key);
            }
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

fn is_blank(key: &Option<String>) -> bool {
    key.as_deref().map_or(true, |k| k.trim().is_empty())
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "cmdcraft", "cmdcraft")
        .ok_or_else(|| anyhow!("Could not determine config directory"))
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}
