//! # Pokedex Core
//!
//! Catalog lookups against PokeAPI and a durable favorites store for the
//! Pokedex client.
//!
//! ## Architecture
//!
//! - `catalog/` - Remote lookups, name search, and the debounced typeahead
//! - `state/` - SQLite key/value storage and the favorites store
//! - `config` - Client, typeahead, and storage settings
//! - `error` - Error taxonomy shared by both components
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pokedex_core::catalog::CatalogClient;
//! use pokedex_core::config::PokedexConfig;
//! use pokedex_core::state::{open_durable, FavoriteEntry, FavoritesStore};
//!
//! let config = PokedexConfig::from_env();
//! let store = FavoritesStore::open(open_durable(&config.storage.db_path).await).await;
//!
//! let client = CatalogClient::new(config.catalog)?;
//! let item = client.fetch_by_name("pikachu").await?;
//! store.toggle(FavoriteEntry::from_item(&item));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod state;

pub use error::{PokedexError, Result};
