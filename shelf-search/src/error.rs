//! Error types for the shelf-search crate.
//!
//! Only failures the dispatcher cannot absorb reach the caller. Unreachable
//! or slow collaborators are recovered into empty result groups; see
//! [`SearchError::is_recoverable`].

/// Errors that can occur while dispatching a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A collaborator (catalog, provider, directory) could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// A collaborator did not answer within the configured timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// A collaborator answered with something that cannot be used.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Invalid dispatcher configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The remote-identity resolution queue rejected a job.
    #[error("queue error: {0}")]
    Queue(String),
}

impl SearchError {
    /// Whether this failure means "no data from that source" rather than a
    /// defect. Recoverable failures become empty groups.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Convenience type alias for shelf-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
