//! Traits for the search backends the dispatcher sequences.
//!
//! The dispatcher owns no data. The local catalog, remote providers, the
//! account and collection directories, and remote-identity resolution all
//! live behind these traits. Failures should be reported as
//! [`SearchError::Unavailable`] or [`SearchError::Timeout`] when they mean
//! "no data right now"; anything else is treated as a defect and propagated.
//!
//! [`SearchError::Unavailable`]: crate::error::SearchError::Unavailable
//! [`SearchError::Timeout`]: crate::error::SearchError::Timeout

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Identity, ScoredResult, SearchResultGroup, Viewer, Visibility};

/// The local book index.
///
/// All implementations must be `Send + Sync` so dispatches can run
/// concurrently across requests.
pub trait LocalCatalog: Send + Sync {
    /// Search local books, returning records whose confidence is at least
    /// `min_confidence`, best first.
    fn search(
        &self,
        query: &str,
        min_confidence: f64,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredResult>>> + Send;
}

/// A federated source of book records (another instance, an open catalog).
///
/// Providers are registered as trait objects so heterogeneous sources can be
/// listed in one priority order.
#[async_trait]
pub trait RemoteProvider: Send + Sync {
    /// Stable name, matched against `DispatchConfig::provider_priority` and
    /// used as the label of the empty group recorded when this provider fails.
    fn name(&self) -> &str;

    /// Search this source. One call may fan out internally and return
    /// several groups.
    async fn search(
        &self,
        query: &str,
        min_confidence: f64,
    ) -> Result<Vec<SearchResultGroup>>;
}

/// Accounts visible to a viewer, scored by fuzzy similarity to the query.
pub trait AccountDirectory: Send + Sync {
    fn search(
        &self,
        query: &str,
        viewer: &Viewer,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredResult>>> + Send;
}

/// Lists visible to a viewer under the given privacy levels, scored by fuzzy
/// similarity to the query.
pub trait CollectionDirectory: Send + Sync {
    fn search(
        &self,
        query: &str,
        viewer: &Viewer,
        visibility: &[Visibility],
    ) -> impl std::future::Future<Output = Result<Vec<ScoredResult>>> + Send;
}

/// Looks up (and persists) a remote account by its full handle.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, handle: &str) -> Result<Option<Identity>>;
}
