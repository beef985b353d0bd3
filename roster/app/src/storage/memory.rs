use super::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-process store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `items`.
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        MemoryStore {
            items: Mutex::new(items),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.lock().await.remove(key);
        Ok(())
    }
}
