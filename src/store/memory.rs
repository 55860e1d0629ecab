//! In-memory option store

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{OptionStore, StoredEntry};

/// Option store backed by a hash map.
///
/// Fast and thread-safe, but everything is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl OptionStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, entry: StoredEntry) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<bool> {
        match self.entries.write().await.get_mut(key) {
            Some(entry) => {
                entry.value = value.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn list(&self) -> Result<Vec<(String, StoredEntry)>> {
        let entries = self.entries.read().await;
        let mut list: Vec<_> = entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();

        list.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(list)
    }
}
