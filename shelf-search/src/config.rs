//! Dispatcher configuration with sensible defaults.
//!
//! [`DispatchConfig`] is handed to the dispatcher at construction. Nothing in
//! this crate reads thresholds, provider order or timeouts from global state.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::Visibility;

/// Configuration for a [`crate::Dispatcher`].
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Minimum confidence applied to book searches when the caller gives none.
    pub min_confidence: f64,
    /// Remote provider names in the order their groups are appended.
    /// Providers missing from this list follow in registration order.
    pub provider_priority: Vec<String>,
    /// Per-provider timeout in milliseconds. A provider that does not answer
    /// in time contributes an empty group.
    pub provider_timeout_ms: u64,
    /// Accounts must score strictly above this similarity.
    pub user_similarity_threshold: f64,
    /// Lists must score strictly above this similarity.
    pub list_similarity_threshold: f64,
    /// Collection privacy levels searchable by any viewer.
    pub list_visibility: Vec<Visibility>,
    /// Source label of the local catalog group.
    pub local_label: String,
    /// Pending remote-identity resolutions kept before new ones are dropped.
    pub resolution_queue_capacity: usize,
    /// Entries per response page: groups for books, records for users and
    /// lists.
    pub page_length: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
            provider_priority: Vec::new(),
            provider_timeout_ms: 8_000,
            user_similarity_threshold: 0.5,
            list_similarity_threshold: 0.1,
            list_visibility: vec![Visibility::Public, Visibility::Followers],
            local_label: "local".into(),
            resolution_queue_capacity: 64,
            page_length: 15,
        }
    }
}

impl DispatchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `min_confidence` must be finite and >= 0
    /// - `provider_timeout_ms` must be greater than 0
    /// - both similarity thresholds must lie in `[0, 1]`
    /// - `list_visibility` must not be empty
    /// - `resolution_queue_capacity` must be greater than 0
    /// - `page_length` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.min_confidence.is_finite() || self.min_confidence < 0.0 {
            return Err(SearchError::Config(
                "min_confidence must be a finite value >= 0".into(),
            ));
        }
        if self.provider_timeout_ms == 0 {
            return Err(SearchError::Config(
                "provider_timeout_ms must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.user_similarity_threshold) {
            return Err(SearchError::Config(
                "user_similarity_threshold must be within [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.list_similarity_threshold) {
            return Err(SearchError::Config(
                "list_similarity_threshold must be within [0, 1]".into(),
            ));
        }
        if self.list_visibility.is_empty() {
            return Err(SearchError::Config(
                "list_visibility must name at least one privacy level".into(),
            ));
        }
        if self.resolution_queue_capacity == 0 {
            return Err(SearchError::Config(
                "resolution_queue_capacity must be greater than 0".into(),
            ));
        }
        if self.page_length == 0 {
            return Err(SearchError::Config(
                "page_length must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse a TOML document, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the document cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self, SearchError> {
        let config: Self =
            toml::from_str(content).map_err(|e| SearchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the file cannot be read, parsed or
    /// validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Position of a provider in the priority list, if it is listed.
    pub fn provider_rank(&self, name: &str) -> Option<usize> {
        self.provider_priority.iter().position(|p| p == name)
    }
}
