//! Concurrent remote provider fan-out.
//!
//! Every provider is queried at once, each under its own timeout. Groups are
//! appended in provider priority order no matter which provider answers
//! first. A provider that times out or is unreachable contributes one empty
//! group under its own name; a provider that returns something unusable
//! aborts the fan-out.

use std::sync::Arc;
use std::time::Duration;

use crate::collaborator::RemoteProvider;
use crate::config::DispatchConfig;
use crate::error::SearchError;
use crate::types::SearchResultGroup;

use super::ranking::rank_group;

/// Order providers by `config.provider_priority`. Unlisted providers keep
/// their registration order after the listed ones.
pub fn order_providers(
    mut providers: Vec<Arc<dyn RemoteProvider>>,
    config: &DispatchConfig,
) -> Vec<Arc<dyn RemoteProvider>> {
    providers.sort_by_key(|provider| config.provider_rank(provider.name()).unwrap_or(usize::MAX));
    providers
}

/// Query all providers concurrently.
///
/// # Errors
///
/// Returns the first non-recoverable provider error in priority order.
/// Timeouts and [`SearchError::Unavailable`] are logged and replaced by an
/// empty group.
pub async fn search_providers(
    providers: &[Arc<dyn RemoteProvider>],
    query: &str,
    min_confidence: f64,
    timeout: Duration,
) -> Result<Vec<SearchResultGroup>, SearchError> {
    let futures: Vec<_> = providers
        .iter()
        .map(|provider| query_provider(provider.as_ref(), query, min_confidence, timeout))
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    let mut groups: Vec<SearchResultGroup> = Vec::new();
    for (provider, outcome) in providers.iter().zip(outcomes) {
        match outcome {
            Ok(provider_groups) => {
                let count: usize = provider_groups.iter().map(SearchResultGroup::len).sum();
                tracing::debug!(provider = provider.name(), count, "provider returned results");
                groups.extend(provider_groups.into_iter().map(rank_group));
            }
            Err(err) if err.is_recoverable() => {
                tracing::warn!(provider = provider.name(), error = %err, "provider query failed");
                groups.push(SearchResultGroup::empty(provider.name()));
            }
            Err(err) => {
                tracing::warn!(provider = provider.name(), error = %err, "provider returned unusable data");
                return Err(err);
            }
        }
    }

    Ok(groups)
}

/// Query one provider, turning an elapsed timeout into [`SearchError::Timeout`].
async fn query_provider(
    provider: &dyn RemoteProvider,
    query: &str,
    min_confidence: f64,
    timeout: Duration,
) -> Result<Vec<SearchResultGroup>, SearchError> {
    match tokio::time::timeout(timeout, provider.search(query, min_confidence)).await {
        Ok(result) => result,
        Err(_) => Err(SearchError::Timeout(format!(
            "{} exceeded {}ms",
            provider.name(),
            timeout.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookRecord, Record, ScoredResult};
    use async_trait::async_trait;

    enum Behaviour {
        Answer { delay_ms: u64, similarity: f64 },
        Hang,
        Down,
        Garbage,
    }

    struct MockProvider {
        name: &'static str,
        behaviour: Behaviour,
    }

    impl MockProvider {
        fn new(name: &'static str, behaviour: Behaviour) -> Arc<dyn RemoteProvider> {
            Arc::new(Self { name, behaviour })
        }
    }

    #[async_trait]
    impl RemoteProvider for MockProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(
            &self,
            query: &str,
            _min_confidence: f64,
        ) -> Result<Vec<SearchResultGroup>, SearchError> {
            match self.behaviour {
                Behaviour::Answer { delay_ms, similarity } => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    let record = Record::Book(BookRecord {
                        key: format!("https://{}.example/{query}", self.name),
                        title: query.to_string(),
                        author: None,
                        year: None,
                        cover: None,
                    });
                    Ok(vec![SearchResultGroup::new(
                        self.name,
                        vec![ScoredResult::new(record, similarity)],
                    )])
                }
                Behaviour::Hang => {
                    std::future::pending::<()>().await;
                    Ok(vec![])
                }
                Behaviour::Down => Err(SearchError::Unavailable("connection refused".into())),
                Behaviour::Garbage => Err(SearchError::Malformed("not json".into())),
            }
        }
    }

    fn sources(groups: &[SearchResultGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.source.as_str()).collect()
    }

    #[test]
    fn priority_list_orders_providers() {
        let config = DispatchConfig {
            provider_priority: vec!["inventaire".into(), "openlibrary".into()],
            ..Default::default()
        };
        let providers = vec![
            MockProvider::new("finna", Behaviour::Down),
            MockProvider::new("openlibrary", Behaviour::Down),
            MockProvider::new("inventaire", Behaviour::Down),
            MockProvider::new("bookwyrm", Behaviour::Down),
        ];
        let ordered = order_providers(providers, &config);
        let names: Vec<&str> = ordered.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["inventaire", "openlibrary", "finna", "bookwyrm"]);
    }

    #[tokio::test]
    async fn groups_follow_priority_not_completion_order() {
        let providers = vec![
            MockProvider::new("slow", Behaviour::Answer { delay_ms: 60, similarity: 0.9 }),
            MockProvider::new("fast", Behaviour::Answer { delay_ms: 0, similarity: 0.8 }),
        ];
        let groups = search_providers(&providers, "dune", 0.0, Duration::from_secs(2))
            .await
            .expect("fan-out");
        assert_eq!(sources(&groups), vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn providers_run_concurrently() {
        let providers = vec![
            MockProvider::new("a", Behaviour::Answer { delay_ms: 150, similarity: 0.5 }),
            MockProvider::new("b", Behaviour::Answer { delay_ms: 150, similarity: 0.5 }),
            MockProvider::new("c", Behaviour::Answer { delay_ms: 150, similarity: 0.5 }),
        ];
        let started = std::time::Instant::now();
        let groups = search_providers(&providers, "dune", 0.0, Duration::from_secs(2))
            .await
            .expect("fan-out");
        assert_eq!(groups.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn hanging_provider_times_out_to_empty_group() {
        let providers = vec![
            MockProvider::new("stuck", Behaviour::Hang),
            MockProvider::new("healthy", Behaviour::Answer { delay_ms: 0, similarity: 0.7 }),
        ];
        let groups = search_providers(&providers, "dune", 0.0, Duration::from_millis(50))
            .await
            .expect("fan-out");
        assert_eq!(sources(&groups), vec!["stuck", "healthy"]);
        assert!(groups[0].is_empty());
        assert_eq!(groups[1].len(), 1);
    }

    #[tokio::test]
    async fn unreachable_provider_becomes_empty_group() {
        let providers = vec![
            MockProvider::new("down", Behaviour::Down),
            MockProvider::new("up", Behaviour::Answer { delay_ms: 0, similarity: 0.7 }),
        ];
        let groups = search_providers(&providers, "dune", 0.0, Duration::from_secs(1))
            .await
            .expect("fan-out");
        assert_eq!(sources(&groups), vec!["down", "up"]);
        assert!(groups[0].is_empty());
    }

    #[tokio::test]
    async fn malformed_provider_response_propagates() {
        let providers = vec![
            MockProvider::new("up", Behaviour::Answer { delay_ms: 0, similarity: 0.7 }),
            MockProvider::new("broken", Behaviour::Garbage),
        ];
        let err = search_providers(&providers, "dune", 0.0, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));
    }

    #[tokio::test]
    async fn no_providers_yields_no_groups() {
        let groups = search_providers(&[], "dune", 0.0, Duration::from_secs(1))
            .await
            .expect("fan-out");
        assert!(groups.is_empty());
    }
}
