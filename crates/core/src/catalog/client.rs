//! # Catalog Client
//!
//! HTTP lookups against the remote catalog. Only `fetch_by_name` reports
//! errors; name search and variant discovery are convenience features and
//! degrade to empty results.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::models::{CatalogItem, CatalogRef, ListingResponse, PokemonResponse, SpeciesResponse};
use crate::config::CatalogConfig;
use crate::error::{PokedexError, Result};

/// Async client for the catalog REST API
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PokedexError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                status: None,
            })?;

        Ok(Self { client, config })
    }

    /// Look up one item by exact, case-insensitive name.
    ///
    /// The item's alternate forms are fetched as well; a failure there only
    /// leaves `variants` empty.
    pub async fn fetch_by_name(&self, name: &str) -> Result<CatalogItem> {
        let name = normalize(name);
        if name.is_empty() {
            return Err(PokedexError::NotFound(name));
        }

        let url = format!(
            "{}/pokemon/{}",
            self.config.api_root(),
            urlencoding::encode(&name)
        );
        tracing::debug!("Fetching catalog item '{}'", name);

        let response: PokemonResponse = self.get_json(&url, &name).await?;
        let species = response
            .species
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| response.name.clone());

        let variants = self.fetch_variants(&species).await;
        Ok(response.into_item(variants))
    }

    /// Up to `limit` names containing `query`, in listing order.
    ///
    /// Queries shorter than the configured minimum return nothing without
    /// touching the network.
    pub async fn search_names(&self, query: &str, limit: usize) -> Vec<CatalogRef> {
        let needle = normalize(query);
        if limit == 0 || needle.chars().count() < self.config.min_query_len {
            return Vec::new();
        }

        match self.try_search_names(&needle, limit).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Name search for '{}' failed: {}", needle, e);
                Vec::new()
            }
        }
    }

    async fn try_search_names(&self, needle: &str, limit: usize) -> Result<Vec<CatalogRef>> {
        let url = format!(
            "{}/pokemon?limit={}",
            self.config.api_root(),
            self.config.listing_limit
        );
        tracing::debug!("Searching catalog names for '{}'", needle);

        let listing: ListingResponse = self.get_json(&url, "pokemon listing").await?;

        Ok(listing
            .results
            .into_iter()
            .filter(|r| r.name.to_lowercase().contains(needle))
            .take(limit)
            .collect())
    }

    /// Alternate forms of a species, excluding the canonical one
    pub async fn fetch_variants(&self, name: &str) -> Vec<CatalogRef> {
        let name = normalize(name);
        if name.is_empty() {
            return Vec::new();
        }

        let url = format!(
            "{}/pokemon-species/{}",
            self.config.api_root(),
            urlencoding::encode(&name)
        );

        match self.get_json::<SpeciesResponse>(&url, &name).await {
            Ok(species) => species.alternate_forms(),
            Err(PokedexError::NotFound(_)) => {
                tracing::debug!("No species entry for '{}'", name);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Variant lookup for '{}' failed: {}", name, e);
                Vec::new()
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, subject: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PokedexError::NotFound(subject.to_string()));
        }
        if !status.is_success() {
            return Err(PokedexError::Network {
                message: format!("Catalog API returned {} for {}", status, subject),
                status: Some(status.as_u16()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PokedexError::decode(subject, e))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const PIKACHU: &str = r#"{
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "sprites": {"front_default": "f.png", "other": {"official-artwork": {"front_default": "art.png"}}},
        "types": [{"slot": 1, "type": {"name": "electric", "url": "u"}}],
        "abilities": [{"ability": {"name": "static", "url": "u"}}],
        "stats": [{"base_stat": 90, "stat": {"name": "speed", "url": "u"}}],
        "species": {"name": "pikachu", "url": "u"}
    }"#;

    const LISTING: &str = r#"{"count": 3, "results": [
        {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon/25/"},
        {"name": "pichu", "url": "https://pokeapi.co/api/v2/pokemon/172/"},
        {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"}
    ]}"#;

    fn client_for(server: &mockito::Server) -> CatalogClient {
        let config = CatalogConfig {
            base_url: server.url(),
            timeout_secs: 5,
            listing_limit: 3,
            min_query_len: 2,
        };
        CatalogClient::new(config).unwrap()
    }

    async fn mock_listing(server: &mut mockito::Server) -> mockito::Mock {
        server
            .mock("GET", "/pokemon")
            .match_query(Matcher::UrlEncoded("limit".into(), "3".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LISTING)
            .create_async()
            .await
    }

    fn names(refs: &[CatalogRef]) -> Vec<&str> {
        refs.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_fetch_by_name_success() {
        let mut server = mockito::Server::new_async().await;
        let _item = server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PIKACHU)
            .create_async()
            .await;
        let _species = server
            .mock("GET", "/pokemon-species/pikachu")
            .with_status(200)
            .with_body(
                r#"{"name": "pikachu", "varieties": [
                    {"is_default": true, "pokemon": {"name": "pikachu", "url": "u/25"}},
                    {"is_default": false, "pokemon": {"name": "pikachu-gmax", "url": "u/10199"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let item = client.fetch_by_name("  Pikachu ").await.unwrap();

        assert_eq!(item.name, "pikachu");
        assert_eq!(item.sprite_url, "art.png");
        assert_eq!(item.types, vec!["electric"]);
        assert_eq!(names(&item.variants), vec!["pikachu-gmax"]);
    }

    #[tokio::test]
    async fn test_fetch_by_name_not_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pokemon/doesnotexist")
            .with_status(404)
            .with_body("Not Found")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.fetch_by_name("doesnotexist").await.unwrap_err();

        assert!(matches!(err, PokedexError::NotFound(ref name) if name == "doesnotexist"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_by_name_blank_is_not_found() {
        let server = mockito::Server::new_async().await;
        let client = client_for(&server);

        let err = client.fetch_by_name("   ").await.unwrap_err();
        assert!(matches!(err, PokedexError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_by_name_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pokemon/eevee")
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.fetch_by_name("eevee").await.unwrap_err();

        match err {
            PokedexError::Network { status, .. } => assert_eq!(status, Some(503)),
            other => panic!("unexpected error variant: {}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_by_name_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pokemon/eevee")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.fetch_by_name("eevee").await.unwrap_err();
        assert!(matches!(err, PokedexError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_by_name_unreachable_host() {
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..CatalogConfig::default()
        };
        let client = CatalogClient::new(config).unwrap();

        let err = client.fetch_by_name("pikachu").await.unwrap_err();
        assert!(matches!(err, PokedexError::Network { status: None, .. }));
    }

    #[tokio::test]
    async fn test_search_names_filters_in_listing_order() {
        let mut server = mockito::Server::new_async().await;
        let _listing = mock_listing(&mut server).await;
        let client = client_for(&server);

        assert_eq!(names(&client.search_names("pi", 5).await), vec!["pikachu", "pichu"]);
        assert_eq!(names(&client.search_names("PIK", 5).await), vec!["pikachu"]);
        assert_eq!(names(&client.search_names("saur", 5).await), vec!["bulbasaur"]);
        assert!(client.search_names("zz", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_names_respects_limit() {
        let mut server = mockito::Server::new_async().await;
        let _listing = mock_listing(&mut server).await;
        let client = client_for(&server);

        assert_eq!(names(&client.search_names("pi", 1).await), vec!["pikachu"]);
        assert!(client.search_names("pi", 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_short_query_skips_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pokemon")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let client = client_for(&server);

        assert!(client.search_names("a", 5).await.is_empty());
        assert!(client.search_names(" p ", 5).await.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_names_absorbs_failures() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pokemon")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let client = client_for(&server);

        assert!(client.search_names("pika", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_variants_degrades_silently() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/pokemon-species/missingno")
            .with_status(404)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/pokemon-species/mew")
            .with_status(200)
            .with_body("{varieties")
            .create_async()
            .await;
        let client = client_for(&server);

        assert!(client.fetch_variants("missingno").await.is_empty());
        assert!(client.fetch_variants("mew").await.is_empty());
        assert!(client.fetch_variants("").await.is_empty());
    }
}
