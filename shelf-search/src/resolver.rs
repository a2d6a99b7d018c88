//! Background queue for remote-identity resolution.
//!
//! A user search for a full handle (`alice@example.com`) asks the resolver to
//! fetch that account so later searches can find it. The dispatcher only
//! enqueues the handle; a worker task drains the queue. Resolved accounts are
//! eventually consistent: they are never visible to the dispatch that
//! enqueued them.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::collaborator::IdentityResolver;
use crate::config::DispatchConfig;
use crate::error::SearchError;

/// Sending half of the resolution queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ResolutionQueue {
    tx: mpsc::Sender<String>,
}

impl ResolutionQueue {
    /// Create a bounded queue and hand back the receiving half for a
    /// caller-managed worker.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Create a bounded queue drained by a worker on the current tokio
    /// runtime. The worker exits once every queue handle is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(resolver: Arc<dyn IdentityResolver>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (queue, rx) = Self::channel(capacity);
        let worker = tokio::spawn(run_worker(resolver, rx));
        (queue, worker)
    }

    /// [`ResolutionQueue::spawn`] sized by
    /// [`DispatchConfig::resolution_queue_capacity`].
    pub fn from_config(
        resolver: Arc<dyn IdentityResolver>,
        config: &DispatchConfig,
    ) -> (Self, JoinHandle<()>) {
        Self::spawn(resolver, config.resolution_queue_capacity)
    }

    /// Queue `handle` for resolution without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Queue`] if the queue is full or the worker has
    /// stopped. The handle is dropped in both cases.
    pub fn enqueue(&self, handle: &str) -> Result<(), SearchError> {
        self.tx.try_send(handle.to_string()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                SearchError::Queue("resolution queue is full".into())
            }
            mpsc::error::TrySendError::Closed(_) => {
                SearchError::Queue("resolution worker has stopped".into())
            }
        })
    }
}

async fn run_worker(resolver: Arc<dyn IdentityResolver>, mut rx: mpsc::Receiver<String>) {
    while let Some(handle) = rx.recv().await {
        match resolver.resolve(&handle).await {
            Ok(Some(identity)) => {
                tracing::debug!(username = %identity.username, "remote identity resolved");
            }
            Ok(None) => {
                tracing::trace!(%handle, "remote identity not found");
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote identity resolution failed");
            }
        }
    }
    tracing::debug!("resolution worker stopped");
}
