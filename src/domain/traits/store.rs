use async_trait::async_trait;
use crate::application::errors::StorageError;

/// Store trait - key-value persistence for bot state
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// All keys starting with `prefix`, sorted
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    // List operations
    async fn push_back(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn pop_front(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn len(&self, key: &str) -> Result<usize, StorageError>;
}
