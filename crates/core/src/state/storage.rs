//! # Durable Storage
//!
//! Key/value seam between the favorites store and the device.
//! `SqliteStorage` persists across restarts; `MemoryStorage` lives only as
//! long as the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::db::PokedexDb;
use crate::error::{PokedexError, Result};

/// Text store addressed by fixed keys
#[async_trait]
pub trait DurableStorage: Send + Sync {
    /// Value under `key`, or `None` if nothing was ever written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed storage using the shared PokedexDb connection
#[derive(Clone)]
pub struct SqliteStorage {
    db: Arc<PokedexDb>,
}

impl SqliteStorage {
    pub fn new(db: Arc<PokedexDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DurableStorage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        tokio::task::spawn_blocking(move || db.get_value(&key))
            .await
            .map_err(|e| PokedexError::Storage(format!("read task failed: {}", e)))?
            .map_err(|e| PokedexError::Storage(format!("{:#}", e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();
        let value = value.to_string();

        tokio::task::spawn_blocking(move || db.set_value(&key, &value))
            .await
            .map_err(|e| PokedexError::Storage(format!("write task failed: {}", e)))?
            .map_err(|e| PokedexError::Storage(format!("{:#}", e)))
    }
}

/// Open SQLite storage at `path`, falling back to process-local storage
/// when the database cannot be opened. Favorites then load empty and live
/// for this run only.
pub async fn open_durable(path: &Path) -> Arc<dyn DurableStorage> {
    match PokedexDb::open(path).await {
        Ok(db) => Arc::new(SqliteStorage::new(Arc::new(db))),
        Err(e) => {
            tracing::warn!(
                "Favorites database {:?} unavailable, keeping favorites in memory: {:#}",
                path,
                e
            );
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Process-local storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one value
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut values) = storage.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

#[async_trait]
impl DurableStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| PokedexError::Storage(format!("Lock error: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PokedexError::Storage(format!("Lock error: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
