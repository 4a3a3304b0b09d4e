//! In-process storage implementation

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::traits::Store;
use crate::application::errors::StorageError;

/// Memory-backed store with Redis-like string and list values
#[derive(Clone, Default)]
pub struct MemoryStore {
    kv: Arc<RwLock<HashMap<String, String>>>,
    lists: Arc<RwLock<HashMap<String, VecDeque<String>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let kv = self.kv.read().await;
        Ok(kv.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut kv = self.kv.write().await;
        kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.kv.write().await.remove(key);
        self.lists.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let kv = self.kv.read().await;
        let mut keys: Vec<String> = kv.keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn push_back(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut lists = self.lists.write().await;
        lists.entry(key.to_string())
            .or_insert_with(VecDeque::new)
            .push_back(value.to_string());
        Ok(())
    }

    async fn pop_front(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut lists = self.lists.write().await;
        let Some(list) = lists.get_mut(key) else {
            return Ok(None);
        };
        let value = list.pop_front();
        // Drained lists disappear, like in Redis
        if list.is_empty() {
            lists.remove(key);
        }
        Ok(value)
    }

    async fn len(&self, key: &str) -> Result<usize, StorageError> {
        let lists = self.lists.read().await;
        Ok(lists.get(key).map(|list| list.len()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_kv_roundtrip_and_delete() {
        let store = MemoryStore::new();
        store.set("friend:u1", "1").await.unwrap();
        assert_eq!(store.get("friend:u1").await.unwrap().as_deref(), Some("1"));

        store.delete("friend:u1").await.unwrap();
        assert!(store.get("friend:u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_filters_by_prefix() {
        let store = MemoryStore::new();
        store.set("friend:b", "1").await.unwrap();
        store.set("friend:a", "1").await.unwrap();
        store.set("ground:a", "{}").await.unwrap();

        let keys = store.keys("friend:").await.unwrap();
        assert_eq!(keys, vec!["friend:a".to_string(), "friend:b".to_string()]);
    }

    #[tokio::test]
    async fn test_list_is_fifo() {
        let store = MemoryStore::new();
        store.push_back("queue", "first").await.unwrap();
        store.push_back("queue", "second").await.unwrap();
        assert_eq!(store.len("queue").await.unwrap(), 2);

        assert_eq!(store.pop_front("queue").await.unwrap().as_deref(), Some("first"));
        assert_eq!(store.pop_front("queue").await.unwrap().as_deref(), Some("second"));
        assert!(store.pop_front("queue").await.unwrap().is_none());
        assert_eq!(store.len("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_drained_list_is_removed() {
        let store = MemoryStore::new();
        store.push_back("queue", "only").await.unwrap();
        store.pop_front("queue").await.unwrap();

        assert!(!store.lists.read().await.contains_key("queue"));
        assert_eq!(store.len("queue").await.unwrap(), 0);
    }
}
