mod entry;
mod file;
mod memory;
mod page;

pub use entry::{CommandEntry, EntryInput, EntryKind, SavedCommand};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use page::{paginate, Page};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

pub const HISTORY_KEY: &str = "command-history";
pub const SAVED_KEY: &str = "saved-commands";

/// Whole-value persistence keyed by name.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn save(&self, key: &str, value: String) -> Result<()>;
}

/// A newest-first sequence stored as one JSON blob under one key.
/// Every mutation reads, modifies and writes back the whole sequence.
pub struct RecordLog<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RecordLog<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> RecordLog<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub async fn entries(&self) -> Result<Vec<T>> {
        match self.store.load(self.key).await? {
            Some(blob) if !blob.trim().is_empty() => serde_json::from_str(&blob)
                .with_context(|| format!("Corrupt data under key '{}'", self.key)),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn prepend(&self, item: T) -> Result<()> {
        let mut items = self.entries().await?;
        items.insert(0, item);
        self.replace(&items).await
    }

    pub async fn replace(&self, items: &[T]) -> Result<()> {
        let blob = serde_json::to_string(items)?;
        self.store.save(self.key, blob).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.replace(&[]).await
    }
}

/// Translations and explanations, newest first. Only cleared as a whole.
#[derive(Clone)]
pub struct HistoryLog {
    log: RecordLog<CommandEntry>,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            log: RecordLog::new(store, HISTORY_KEY),
        }
    }

    pub async fn entries(&self) -> Result<Vec<CommandEntry>> {
        self.log.entries().await
    }

    pub async fn record(&self, entry: CommandEntry) -> Result<()> {
        self.log.prepend(entry).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.log.clear().await
    }
}

/// User-curated commands, newest first.
#[derive(Clone)]
pub struct SavedLibrary {
    log: RecordLog<SavedCommand>,
}

impl SavedLibrary {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            log: RecordLog::new(store, SAVED_KEY),
        }
    }

    pub async fn entries(&self) -> Result<Vec<SavedCommand>> {
        self.log.entries().await
    }

    pub async fn add(&self, saved: SavedCommand) -> Result<()> {
        self.log.prepend(saved).await
    }

    /// Deletes the command with `id`; returns whether anything was removed.
    pub async fn remove(&self, id: Uuid) -> Result<bool> {
        let mut items = self.log.entries().await?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.log.replace(&items).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ExplainInput;

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let history = HistoryLog::new(memory());
        for command in ["ls", "pwd", "whoami"] {
            let input = ExplainInput { command: command.to_string() };
            history.record(CommandEntry::explanation(input, "...")).await.unwrap();
        }

        let entries = history.entries().await.unwrap();
        let commands: Vec<&str> = entries.iter().map(|e| e.input.summary()).collect();
        assert_eq!(commands, vec!["whoami", "pwd", "ls"]);
    }

    #[tokio::test]
    async fn test_clear_history_twice() {
        let history = HistoryLog::new(memory());
        let input = ExplainInput { command: "ls".to_string() };
        history.record(CommandEntry::explanation(input, "...")).await.unwrap();

        history.clear().await.unwrap();
        assert!(history.entries().await.unwrap().is_empty());
        history.clear().await.unwrap();
        assert!(history.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_saved_add_and_remove() {
        let saved = SavedLibrary::new(memory());
        saved.add(SavedCommand::new("pwd", "where am i")).await.unwrap();
        let target = SavedCommand::new("ls -la", "list files");
        let id = target.id;
        saved.add(target).await.unwrap();

        assert_eq!(saved.entries().await.unwrap()[0].command, "ls -la");
        assert!(saved.remove(id).await.unwrap());
        assert!(!saved.remove(id).await.unwrap());

        let remaining = saved.entries().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|item| item.id != id));
    }

    #[tokio::test]
    async fn test_logs_share_a_store_without_mixing() {
        let store = memory();
        let history = HistoryLog::new(Arc::clone(&store));
        let saved = SavedLibrary::new(store);

        saved.add(SavedCommand::new("ls", "list files")).await.unwrap();
        assert!(history.entries().await.unwrap().is_empty());
    }
}
