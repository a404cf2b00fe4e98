// Ephemeral key-value storage contract.
//
// The OAuth flow keeps pending-state and one-time credentials in a
// TTL-bound key-value store. The store is an external collaborator; any
// backend with get/set/delete and second-granularity expiry satisfies the
// trait. `MemorySecondaryStorage` is the reference implementation used in
// development and tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

/// A TTL-capable key-value storage backend for short-lived session data.
#[async_trait]
pub trait SecondaryStorage: Send + Sync + std::fmt::Debug {
    /// Get a value by key. Returns `None` if the key is missing or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a key-value pair with an optional TTL in seconds.
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Key for the pending authorization state of an (org, user) pair.
pub fn pending_state_key(org_id: &str, user_id: &str) -> String {
    format!("pending_state:{org_id}:{user_id}")
}

/// Key for the one-time credentials of an (org, user) pair.
pub fn credentials_key(org_id: &str, user_id: &str) -> String {
    format!("credentials:{org_id}:{user_id}")
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// In-memory implementation of `SecondaryStorage`.
///
/// Suitable for development, tests, and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct MemorySecondaryStorage {
    store: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemorySecondaryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all expired entries.
    pub async fn sweep(&self) {
        let mut store = self.store.write().await;
        store.retain(|_, entry| !entry.is_expired());
    }
}

#[async_trait]
impl SecondaryStorage for MemorySecondaryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let store = self.store.read().await;
        Ok(store
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), StorageError> {
        let expires_at = ttl.map(|secs| Instant::now() + Duration::from_secs(secs));
        let mut store = self.store.write().await;
        store.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }
}
