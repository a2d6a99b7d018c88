//! Query classification: identifier normalisation and domain inference.
//!
//! Runs before any collaborator is called. Everything here is pure.

pub mod domain;
pub mod isbn;

pub use domain::{infer_domain, is_full_handle};
pub use isbn::{is_identifier, normalize_if_identifier};

use serde::{Deserialize, Serialize};

use crate::types::SearchDomain;

/// A caller query after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// The query exactly as supplied.
    pub raw: String,
    /// Separator-free ISBN when `raw` is one, otherwise equal to `raw`.
    pub normalized: String,
    pub is_identifier: bool,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize_if_identifier(raw);
        let is_identifier = is_identifier(raw);
        Self {
            raw: raw.to_string(),
            normalized,
            is_identifier,
        }
    }

    /// Whether there is anything to search for.
    pub fn is_blank(&self) -> bool {
        self.normalized.trim().is_empty()
    }
}

/// Normalise `raw` and infer its domain as if the caller named none.
pub fn classify(raw: &str) -> (String, SearchDomain) {
    let query = Query::parse(raw);
    let domain = infer_domain(None, &query.raw);
    (query.normalized, domain)
}
