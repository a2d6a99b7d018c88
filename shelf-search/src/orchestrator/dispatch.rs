//! The search dispatcher: picks collaborators per domain and applies the
//! local-first remote fallback for books.
//!
//! # Book domain
//!
//! ```text
//! local catalog ──► anonymous viewer?                     ──► stop
//!               └─► local results and no remote request?  ──► stop
//!               └─► otherwise: all remote providers, concurrently
//! ```
//!
//! Anonymous viewers never reach remote providers, even when local search
//! finds nothing; remote fan-out is reserved for signed-in traffic.
//!
//! # User and list domains
//!
//! One directory call, cut at a fixed similarity threshold that does not
//! depend on the caller's `min_confidence`.

use std::sync::Arc;
use std::time::Duration;

use crate::classify::is_full_handle;
use crate::collaborator::{AccountDirectory, CollectionDirectory, LocalCatalog, RemoteProvider};
use crate::config::DispatchConfig;
use crate::error::SearchError;
use crate::request::{SearchRequest, SearchResponse};
use crate::resolver::ResolutionQueue;
use crate::types::{ScoredResult, SearchDomain, SearchResultGroup, SearchResultSet};

use super::ranking::{rank, threshold_group};
use super::remote::{order_providers, search_providers};

/// Label of the single group produced by a user search.
pub const ACCOUNTS_LABEL: &str = "accounts";
/// Label of the single group produced by a list search.
pub const LISTS_LABEL: &str = "lists";

/// Result of one dispatch.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub results: SearchResultSet,
    /// True iff at least one remote provider call was issued.
    pub remote_searched: bool,
}

impl DispatchOutcome {
    fn local_only(results: SearchResultSet) -> Self {
        Self {
            results,
            remote_searched: false,
        }
    }
}

/// Routes classified search requests to the right collaborators.
///
/// Holds no mutable state; one dispatcher can serve any number of concurrent
/// requests.
pub struct Dispatcher<C, A, L> {
    config: DispatchConfig,
    catalog: C,
    accounts: A,
    collections: L,
    providers: Vec<Arc<dyn RemoteProvider>>,
    resolution: Option<ResolutionQueue>,
}

impl<C, A, L> Dispatcher<C, A, L>
where
    C: LocalCatalog,
    A: AccountDirectory,
    L: CollectionDirectory,
{
    /// Build a dispatcher with no remote providers and no identity
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(
        config: DispatchConfig,
        catalog: C,
        accounts: A,
        collections: L,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            accounts,
            collections,
            providers: Vec::new(),
            resolution: None,
        })
    }

    /// Register remote providers. They are kept in
    /// `config.provider_priority` order.
    pub fn with_providers(
        mut self,
        providers: impl IntoIterator<Item = Arc<dyn RemoteProvider>>,
    ) -> Self {
        self.providers.extend(providers);
        self.providers = order_providers(std::mem::take(&mut self.providers), &self.config);
        self
    }

    /// Hand full account handles found in user searches to `queue`.
    pub fn with_resolution_queue(mut self, queue: ResolutionQueue) -> Self {
        self.resolution = Some(queue);
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Names of the registered providers in the order their groups appear.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run one search.
    ///
    /// Blank queries return an empty result set without calling anything.
    ///
    /// # Errors
    ///
    /// Only non-recoverable collaborator failures (see
    /// [`SearchError::is_recoverable`]) are returned. Unreachable or slow
    /// sources produce empty groups instead.
    pub async fn dispatch(&self, request: &SearchRequest) -> Result<DispatchOutcome, SearchError> {
        if request.query.is_blank() {
            tracing::debug!(domain = %request.domain, "blank query, nothing to search");
            return Ok(DispatchOutcome::default());
        }
        tracing::trace!(query = %request.query.normalized, domain = %request.domain, "dispatching search");

        match request.domain {
            SearchDomain::Book => self.book_search(request).await,
            SearchDomain::User => self.user_search(request).await,
            SearchDomain::List => self.list_search(request).await,
        }
    }

    /// Run one search and shape it for the presentation layer, one page of
    /// `config.page_length` entries at a time.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`].
    pub async fn respond(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let outcome = self.dispatch(request).await?;
        Ok(SearchResponse::new(request, outcome, self.config.page_length))
    }

    /// Local catalog only, never cascading to remote providers.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`].
    pub async fn search_local_books(
        &self,
        query: &str,
        min_confidence: Option<f64>,
    ) -> Result<Vec<ScoredResult>, SearchError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let min_confidence = min_confidence.unwrap_or(self.config.min_confidence);
        self.local_group(query, min_confidence)
            .await
            .map(|group| group.results)
    }

    async fn book_search(&self, request: &SearchRequest) -> Result<DispatchOutcome, SearchError> {
        let query = request.query.normalized.as_str();
        let min_confidence = request.min_confidence.unwrap_or(self.config.min_confidence);

        let local = self.local_group(query, min_confidence).await?;
        let local_found = !local.is_empty();

        let mut results = SearchResultSet::new();
        results.push(local);

        if !request.viewer.is_authenticated() || (local_found && !request.remote_requested) {
            return Ok(DispatchOutcome::local_only(results));
        }

        if self.providers.is_empty() {
            tracing::debug!("no remote providers configured");
            return Ok(DispatchOutcome::local_only(results));
        }

        tracing::debug!(
            local_found,
            remote_requested = request.remote_requested,
            providers = self.providers.len(),
            "falling back to remote providers"
        );
        let timeout = Duration::from_millis(self.config.provider_timeout_ms);
        let remote = search_providers(&self.providers, query, min_confidence, timeout).await?;
        results.extend(remote);

        Ok(DispatchOutcome {
            results,
            remote_searched: true,
        })
    }

    async fn local_group(
        &self,
        query: &str,
        min_confidence: f64,
    ) -> Result<SearchResultGroup, SearchError> {
        let label = self.config.local_label.as_str();
        let results = recover(label, self.catalog.search(query, min_confidence).await)?;
        tracing::debug!(count = results.len(), "local catalog returned results");
        Ok(SearchResultGroup::new(label, rank(results)))
    }

    async fn user_search(&self, request: &SearchRequest) -> Result<DispatchOutcome, SearchError> {
        if !request.viewer.is_authenticated() {
            tracing::debug!("anonymous viewer, user search skipped");
            return Ok(DispatchOutcome::default());
        }

        let query = request.query.normalized.as_str();
        if is_full_handle(query) {
            self.request_resolution(query);
        }

        let results = recover(
            ACCOUNTS_LABEL,
            self.accounts.search(query, &request.viewer).await,
        )?;
        let group = threshold_group(ACCOUNTS_LABEL, results, self.config.user_similarity_threshold);
        Ok(DispatchOutcome::local_only(single(group)))
    }

    async fn list_search(&self, request: &SearchRequest) -> Result<DispatchOutcome, SearchError> {
        let results = recover(
            LISTS_LABEL,
            self.collections
                .search(
                    &request.query.normalized,
                    &request.viewer,
                    &self.config.list_visibility,
                )
                .await,
        )?;
        let group = threshold_group(LISTS_LABEL, results, self.config.list_similarity_threshold);
        Ok(DispatchOutcome::local_only(single(group)))
    }

    /// Queue a remote handle for background resolution. Never blocks and
    /// never fails the dispatch.
    fn request_resolution(&self, handle: &str) {
        let Some(queue) = &self.resolution else {
            tracing::trace!(%handle, "no resolution queue, handle not resolved");
            return;
        };
        if let Err(err) = queue.enqueue(handle) {
            tracing::warn!(error = %err, "remote identity resolution dropped");
        }
    }
}

/// Absorb "no data" failures from a collaborator into an empty result list.
fn recover(
    source: &str,
    outcome: Result<Vec<ScoredResult>, SearchError>,
) -> Result<Vec<ScoredResult>, SearchError> {
    match outcome {
        Ok(results) => Ok(results),
        Err(err) if err.is_recoverable() => {
            tracing::warn!(source, error = %err, "search source unavailable");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

fn single(group: SearchResultGroup) -> SearchResultSet {
    let mut set = SearchResultSet::new();
    set.push(group);
    set
}
