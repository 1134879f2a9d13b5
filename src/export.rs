use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

pub const EXPORT_FILE_STEM: &str = "Command";
pub const EXPORT_FILE_EXTENSION: &str = "bat";

/// Gives up after this many `Command (n).bat` names are taken.
const MAX_SUFFIX: usize = 999;

/// Default target for exports: the user's download folder, else the working directory.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Writes `command` to `dir/Command.bat`, or `Command (n).bat` when that name is taken.
pub async fn export_command(command: &str, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    for suffix in 0..=MAX_SUFFIX {
        let path = dir.join(file_name(suffix));
        let file = OpenOptions::new().write(true).create_new(true).open(&path).await;
        match file {
            Ok(mut file) => {
                file.write_all(command.as_bytes()).await?;
                file.flush().await?;
                tracing::info!(path = %path.display(), "exported command");
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to write {}", path.display()));
            }
        }
    }

    anyhow::bail!("Too many exported commands in {}", dir.display())
}

fn file_name(suffix: usize) -> String {
    if suffix == 0 {
        format!("{}.{}", EXPORT_FILE_STEM, EXPORT_FILE_EXTENSION)
    } else {
        format!("{} ({}).{}", EXPORT_FILE_STEM, suffix, EXPORT_FILE_EXTENSION)
    }
}
