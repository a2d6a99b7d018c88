//! Search orchestrator: domain routing, remote fallback, ranking.
//!
//! This module routes a classified request to the collaborators of its
//! domain, falls back from the local catalog to remote providers for books,
//! queries remote providers concurrently under a timeout, and returns groups
//! sorted by similarity with duplicates removed.

pub mod dedup;
pub mod dispatch;
pub mod key_normalize;
pub mod ranking;
pub mod remote;

pub use dispatch::{DispatchOutcome, Dispatcher, ACCOUNTS_LABEL, LISTS_LABEL};
