//! # Favorites Store
//!
//! In-memory list of favorited catalog items mirrored to durable storage.
//!
//! The store is hydrated once with [`FavoritesStore::load`]. Every mutation
//! updates memory immediately and queues a snapshot for a background writer
//! task, so getters and mutators stay synchronous and usable from render
//! code. Storage failures are logged and never reach the caller; memory
//! remains the source of truth for the session.
//!
//! ```rust,ignore
//! let storage = Arc::new(SqliteStorage::new(db));
//! let store = FavoritesStore::open(storage).await;
//!
//! store.add(FavoriteEntry::from_item(&item));
//! assert!(store.is_favorite("pikachu"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{mpsc, oneshot};

use super::storage::DurableStorage;
use crate::catalog::CatalogItem;
use crate::error::PokedexError;

/// Storage key holding the serialized collection
pub const FAVORITES_KEY: &str = "favorites";

/// A favorited catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Lowercase catalog identifier, unique within the collection
    pub name: String,
    /// Artwork shown in the favorites list
    #[serde(rename = "image", alias = "imageUrl")]
    pub image_url: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl FavoriteEntry {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>, types: Vec<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
            types,
        }
    }

    /// Copy the favoriting subset out of a lookup result
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            image_url: item.sprite_url.clone(),
            types: item.types.clone(),
        }
    }
}

/// Favorites in insertion order
pub type FavoritesCollection = Vec<FavoriteEntry>;

/// Whether the persisted collection has been read yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEpoch {
    Unloaded,
    Loaded,
}

enum WriteCommand {
    Save(String),
    Flush(oneshot::Sender<()>),
}

struct Inner {
    entries: FavoritesCollection,
    epoch: StoreEpoch,
}

/// Durable, query-able set of favorites keyed by name
pub struct FavoritesStore {
    storage: Arc<dyn DurableStorage>,
    inner: RwLock<Inner>,
    write_tx: mpsc::UnboundedSender<WriteCommand>,
}

impl FavoritesStore {
    /// Create an unloaded store and spawn its writer task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        spawn_writer(Arc::clone(&storage), write_rx);

        Self {
            storage,
            inner: RwLock::new(Inner {
                entries: Vec::new(),
                epoch: StoreEpoch::Unloaded,
            }),
            write_tx,
        }
    }

    /// Create a store and hydrate it from storage
    pub async fn open(storage: Arc<dyn DurableStorage>) -> Self {
        let store = Self::new(storage);
        store.load().await;
        store
    }

    /// Read the persisted collection into memory.
    ///
    /// A missing value, unreadable storage, or an unparseable payload all
    /// yield an empty collection.
    pub async fn load(&self) -> FavoritesCollection {
        let entries = match self.storage.get(FAVORITES_KEY).await {
            Ok(Some(raw)) => match decode_collection(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Discarding stored favorites: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load favorites: {}", e);
                Vec::new()
            }
        };

        tracing::info!("Loaded {} favorites", entries.len());

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.entries = entries.clone();
        inner.epoch = StoreEpoch::Loaded;
        entries
    }

    /// Add `entry`, replacing any existing entry with the same name in place
    pub fn add(&self, entry: FavoriteEntry) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        match inner.entries.iter().position(|e| e.name == entry.name) {
            Some(index) => {
                tracing::debug!("Replacing favorite '{}'", entry.name);
                inner.entries[index] = entry;
            }
            None => {
                tracing::debug!("Adding favorite '{}'", entry.name);
                inner.entries.push(entry);
            }
        }

        self.queue_save(&inner.entries);
    }

    /// Remove every entry named `name`. Returns whether anything was removed.
    pub fn remove(&self, name: &str) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let before = inner.entries.len();
        inner.entries.retain(|e| e.name != name);
        if inner.entries.len() == before {
            return false;
        }

        tracing::debug!("Removed favorite '{}'", name);
        self.queue_save(&inner.entries);
        true
    }

    /// Remove the entry if present, otherwise add it.
    /// Returns the new favorite state.
    pub fn toggle(&self, entry: FavoriteEntry) -> bool {
        if self.remove(&entry.name) {
            false
        } else {
            self.add(entry);
            true
        }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.iter().any(|e| e.name == name)
    }

    /// Current collection in insertion order
    pub fn list(&self) -> FavoritesCollection {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.clone()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn epoch(&self) -> StoreEpoch {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.epoch
    }

    pub fn is_loaded(&self) -> bool {
        self.epoch() == StoreEpoch::Loaded
    }

    /// Wait until every queued write has reached storage
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.write_tx.send(WriteCommand::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }

    // Called with the write lock held so snapshots queue in mutation order
    fn queue_save(&self, entries: &[FavoriteEntry]) {
        let payload = match serde_json::to_string(entries) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to serialize favorites: {}", e);
                return;
            }
        };

        if self.write_tx.send(WriteCommand::Save(payload)).is_err() {
            tracing::warn!("Favorites writer has stopped; change kept in memory only");
        }
    }
}

fn spawn_writer(storage: Arc<dyn DurableStorage>, mut write_rx: mpsc::UnboundedReceiver<WriteCommand>) {
    tokio::spawn(async move {
        while let Some(command) = write_rx.recv().await {
            match command {
                WriteCommand::Save(payload) => {
                    if let Err(e) = storage.set(FAVORITES_KEY, &payload).await {
                        tracing::warn!("Failed to persist favorites: {}", e);
                    }
                }
                WriteCommand::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
    });
}

/// Parse a stored collection, keeping the first entry for any repeated name
fn decode_collection(raw: &str) -> Result<FavoritesCollection, PokedexError> {
    let entries: FavoritesCollection =
        serde_json::from_str(raw).map_err(|e| PokedexError::decode("stored favorites", e))?;

    let mut seen = HashSet::new();
    Ok(entries
        .into_iter()
        .filter(|e| seen.insert(e.name.clone()))
        .collect())
}
