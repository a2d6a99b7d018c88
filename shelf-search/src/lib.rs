//! # shelf-search
//!
//! Unified search dispatch for a federated book catalog.
//!
//! Given a free-text or identifier query, this crate decides which search
//! domain to query (books, users, lists), in what order, with what fallback,
//! and how to order the results. Storage, remote protocols and rendering are
//! collaborators behind the traits in [`collaborator`].
//!
//! ## Design
//!
//! - ISBN-10/ISBN-13 queries are detected by checksum and stripped of
//!   separators before searching
//! - Queries containing `@` default to user search, everything else to books
//! - Book search is local-first; remote providers are queried only for
//!   signed-in viewers when local search is empty or remote is requested
//! - Remote providers run concurrently, each under a timeout, and their
//!   groups keep configured priority order
//! - Graceful degradation: an unreachable or slow provider yields an empty
//!   group, the rest of the dispatch still succeeds
//! - Full account handles are queued for background resolution and never
//!   block the search
//!
//! ## Privacy
//!
//! - Anonymous viewers cannot enumerate accounts
//! - Search queries are logged only at trace level

pub mod classify;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod request;
pub mod resolver;
pub mod types;

pub use classify::{classify, normalize_if_identifier, Query};
pub use collaborator::{
    AccountDirectory, CollectionDirectory, IdentityResolver, LocalCatalog, RemoteProvider,
};
pub use config::DispatchConfig;
pub use error::{Result, SearchError};
pub use orchestrator::{DispatchOutcome, Dispatcher};
pub use request::{SearchParams, SearchRequest, SearchResponse};
pub use resolver::ResolutionQueue;
pub use types::{
    AccountRecord, BookRecord, CollectionRecord, Identity, Record, ScoredResult, SearchDomain,
    SearchResultGroup, SearchResultSet, Viewer, Visibility,
};
