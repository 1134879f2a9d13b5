use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::KeyValueStore;

/// Keeps each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    storage_path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { storage_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.storage_path.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.file_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn save(&self, key: &str, value: String) -> Result<()> {
        fs::create_dir_all(&self.storage_path).await?;

        // Staged write; the rename swaps the whole blob in one step.
        let path = self.file_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)
            .await
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        fs::rename(&staging, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{HistoryLog, SavedCommand, SavedLibrary};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_key_reads_as_none() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path().join("data"));
        assert_eq!(store.load("command-history").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_saved_commands_survive_a_new_store() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("data");

        let saved = SavedLibrary::new(Arc::new(FileStore::new(dir.clone())));
        saved.add(SavedCommand::new("du -sh .", "folder size")).await.unwrap();

        let reopened = SavedLibrary::new(Arc::new(FileStore::new(dir.clone())));
        let entries = reopened.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "folder size");
        assert!(dir.join("saved-commands.json").exists());
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_reported() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("command-history.json"), "{not json").unwrap();

        let history = HistoryLog::new(Arc::new(FileStore::new(temp.path().to_path_buf())));
        let err = history.entries().await.unwrap_err();
        assert!(err.to_string().contains("command-history"));
    }
}
