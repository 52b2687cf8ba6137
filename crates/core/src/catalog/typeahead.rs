//! # Typeahead
//!
//! Debounced name suggestions with last-query-wins ordering.
//!
//! ```text
//! input("pi")  ──seq 1──▶ wait debounce ──▶ superseded, never sent
//! input("pik") ──seq 2──▶ wait debounce ──▶ search ──▶ publish if seq 2 is still latest
//! ```
//!
//! Requests already in flight are not cancelled. Their responses are
//! compared against the latest sequence number and dropped when stale.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::client::CatalogClient;
use super::models::CatalogRef;
use crate::config::TypeaheadConfig;

/// Source of name suggestions
#[async_trait]
pub trait NameSearch: Send + Sync {
    async fn search_names(&self, query: &str, limit: usize) -> Vec<CatalogRef>;
}

#[async_trait]
impl NameSearch for CatalogClient {
    async fn search_names(&self, query: &str, limit: usize) -> Vec<CatalogRef> {
        CatalogClient::search_names(self, query, limit).await
    }
}

/// The suggestion set currently visible
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    /// Sequence number of the input that produced this set
    pub seq: u64,
    pub query: String,
    pub results: Vec<CatalogRef>,
}

/// Debounced front end over a [`NameSearch`]
pub struct Typeahead<S: NameSearch + 'static> {
    source: Arc<S>,
    config: TypeaheadConfig,
    latest: Arc<AtomicU64>,
    visible: Arc<watch::Sender<Suggestions>>,
}

impl<S: NameSearch + 'static> Typeahead<S> {
    pub fn new(source: Arc<S>, config: TypeaheadConfig) -> Self {
        let (visible, _) = watch::channel(Suggestions::default());
        Self {
            source,
            config,
            latest: Arc::new(AtomicU64::new(0)),
            visible: Arc::new(visible),
        }
    }

    /// Receiver notified whenever the visible suggestions change
    pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
        self.visible.subscribe()
    }

    pub fn current(&self) -> Suggestions {
        self.visible.borrow().clone()
    }

    /// Record a new query. Returns its sequence number.
    ///
    /// Short queries clear the suggestions immediately. Longer ones search
    /// after the debounce window unless a newer input arrives first.
    /// Must be called from within a Tokio runtime.
    pub fn input(&self, query: impl Into<String>) -> u64 {
        let query = query.into();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().chars().count() < self.config.min_query_len {
            publish(&self.visible, &self.latest, seq, query, Vec::new());
            return seq;
        }

        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.latest);
        let visible = Arc::clone(&self.visible);
        let debounce = self.config.debounce();
        let limit = self.config.limit;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != seq {
                tracing::trace!("Query '{}' superseded before sending", query);
                return;
            }

            let results = source.search_names(&query, limit).await;
            if !publish(&visible, &latest, seq, query.clone(), results) {
                tracing::debug!("Dropping stale suggestions for '{}'", query);
            }
        });

        seq
    }
}

/// Replace the visible set if `seq` is still the newest input.
/// The check runs under the channel lock so an older set never
/// overwrites a newer one.
fn publish(
    visible: &watch::Sender<Suggestions>,
    latest: &AtomicU64,
    seq: u64,
    query: String,
    results: Vec<CatalogRef>,
) -> bool {
    visible.send_if_modified(|current| {
        if seq != latest.load(Ordering::SeqCst) || seq < current.seq {
            return false;
        }
        *current = Suggestions {
            seq,
            query,
            results,
        };
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fixture whose response time depends on the query
    struct SlowSource {
        names: Vec<&'static str>,
        delays: Vec<(&'static str, Duration)>,
        calls: Mutex<Vec<String>>,
    }

    impl SlowSource {
        fn new(delays: Vec<(&'static str, Duration)>) -> Self {
            Self {
                names: vec!["pikachu", "pichu", "bulbasaur"],
                delays,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NameSearch for SlowSource {
        async fn search_names(&self, query: &str, limit: usize) -> Vec<CatalogRef> {
            self.calls.lock().unwrap().push(query.to_string());

            let delay = self
                .delays
                .iter()
                .find(|(q, _)| *q == query)
                .map(|(_, d)| *d)
                .unwrap_or(Duration::from_millis(10));
            tokio::time::sleep(delay).await;

            self.names
                .iter()
                .filter(|n| n.contains(query))
                .take(limit)
                .map(|n| CatalogRef {
                    name: n.to_string(),
                    fetch_ref: format!("https://pokeapi.co/api/v2/pokemon/{}/", n),
                })
                .collect()
        }
    }

    fn visible_names(typeahead: &Typeahead<SlowSource>) -> Vec<String> {
        typeahead.current().results.into_iter().map(|r| r.name).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_sends_only_last_query() {
        let source = Arc::new(SlowSource::new(Vec::new()));
        let typeahead = Typeahead::new(Arc::clone(&source), TypeaheadConfig::default());

        typeahead.input("pi");
        tokio::time::sleep(Duration::from_millis(100)).await;
        typeahead.input("pik");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(source.calls(), vec!["pik"]);
        assert_eq!(visible_names(&typeahead), vec!["pikachu"]);
        assert_eq!(typeahead.current().query, "pik");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_dropped() {
        let source = Arc::new(SlowSource::new(vec![("pi", Duration::from_secs(2))]));
        let typeahead = Typeahead::new(Arc::clone(&source), TypeaheadConfig::default());

        // "pi" clears the debounce window and is in flight when "pik" arrives
        typeahead.input("pi");
        tokio::time::sleep(Duration::from_millis(350)).await;
        let newest = typeahead.input("pik");
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(source.calls(), vec!["pi", "pik"]);
        let current = typeahead.current();
        assert_eq!(current.seq, newest);
        assert_eq!(current.query, "pik");
        assert_eq!(visible_names(&typeahead), vec!["pikachu"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_clears_without_search() {
        let source = Arc::new(SlowSource::new(Vec::new()));
        let typeahead = Typeahead::new(Arc::clone(&source), TypeaheadConfig::default());

        typeahead.input("pi");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(visible_names(&typeahead), vec!["pikachu", "pichu"]);

        typeahead.input("p");
        assert!(typeahead.current().results.is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), vec!["pi"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let source = Arc::new(SlowSource::new(Vec::new()));
        let config = TypeaheadConfig {
            limit: 1,
            ..TypeaheadConfig::default()
        };
        let typeahead = Typeahead::new(source, config);
        let mut rx = typeahead.subscribe();

        typeahead.input("pi");
        rx.changed().await.unwrap();

        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.query, "pi");
        assert_eq!(seen.results.len(), 1);
        assert_eq!(seen.results[0].name, "pikachu");
    }
}
