//! # Pokedex Configuration
//!
//! Configuration types for the catalog client, the typeahead, and storage.
//! Every type has a usable `Default`; `PokedexConfig::from_env()` layers
//! environment overrides on top.
//!
//! ## Example
//! ```rust,ignore
//! use pokedex_core::config::PokedexConfig;
//!
//! let config = PokedexConfig::from_env().with_db_path("/tmp/pokedex.db");
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::state::io::get_runtime_path;

/// Public PokeAPI endpoint
pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";

/// Queries shorter than this never reach the network
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PokedexConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub typeahead: TypeaheadConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl PokedexConfig {
    /// Defaults plus `POKEDEX_API_URL`, `POKEDEX_TIMEOUT_SECS` and
    /// `POKEDEX_DB_PATH` overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("POKEDEX_API_URL") {
            if !url.trim().is_empty() {
                config.catalog.base_url = url;
            }
        }

        if let Ok(raw) = std::env::var("POKEDEX_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.catalog.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid POKEDEX_TIMEOUT_SECS: {:?}", raw),
            }
        }

        if let Ok(path) = std::env::var("POKEDEX_DB_PATH") {
            if !path.trim().is_empty() {
                config.storage.db_path = PathBuf::from(path);
            }
        }

        config
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.catalog.base_url = url.into();
        self
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.db_path = path.into();
        self
    }
}

/// Remote catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// `limit` sent to the listing endpoint when filtering names
    pub listing_limit: usize,
    /// Minimum trimmed query length for name search
    pub min_query_len: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            listing_limit: 2000,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL with any trailing slashes removed
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Debounced suggestion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeaheadConfig {
    /// Idle window before a query is sent
    pub debounce_ms: u64,
    /// Maximum suggestions shown
    pub limit: usize,
    /// Shorter queries clear suggestions without searching
    pub min_query_len: usize,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            limit: 5,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl TypeaheadConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Durable storage location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: get_runtime_path().join("pokedex.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PokedexConfig::default();
        assert_eq!(config.catalog.base_url, DEFAULT_API_URL);
        assert_eq!(config.typeahead.debounce(), Duration::from_millis(300));
        assert_eq!(config.catalog.min_query_len, 2);
        assert!(config.storage.db_path.ends_with("pokedex.db"));
    }

    #[test]
    fn test_api_root_trims_trailing_slash() {
        let config = CatalogConfig::new("http://localhost:1234/api/v2/");
        assert_eq!(config.api_root(), "http://localhost:1234/api/v2");
    }

    #[test]
    fn test_config_serialization() {
        let config = PokedexConfig::default()
            .with_api_url("http://localhost:1234/api/v2")
            .with_db_path("/tmp/favs.db");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("localhost:1234"));
        assert!(json.contains("/tmp/favs.db"));

        let parsed: PokedexConfig = serde_json::from_str(r#"{"catalog":{"base_url":"http://x","timeout_secs":1,"listing_limit":3,"min_query_len":2}}"#).unwrap();
        assert_eq!(parsed.catalog.listing_limit, 3);
        assert_eq!(parsed.typeahead.limit, 5);
    }
}
