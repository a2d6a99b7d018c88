//! Core types for search domains, viewers, records and result groups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of entity a search request targets.
///
/// Exactly one domain is active per request. Matching on this enum is
/// exhaustive, so a new domain is a compile-time change everywhere it is
/// dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDomain {
    /// Books and editions, local catalog first then remote providers.
    #[default]
    Book,
    /// Local and known remote accounts.
    User,
    /// Curated lists of books.
    List,
}

impl SearchDomain {
    /// Returns the parameter name of this domain (`book`, `user`, `list`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::User => "user",
            Self::List => "list",
        }
    }

    /// Parses an explicit domain parameter.
    ///
    /// Returns `None` for absent, blank or unrecognised values.
    pub fn from_param(param: Option<&str>) -> Option<Self> {
        let param = param?.trim();
        Self::all()
            .iter()
            .copied()
            .find(|domain| domain.name().eq_ignore_ascii_case(param))
    }

    /// Returns all domain variants.
    pub fn all() -> &'static [SearchDomain] {
        &[Self::Book, Self::User, Self::List]
    }
}

impl fmt::Display for SearchDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A known account, local or remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Full username, `localname@domain` for remote accounts.
    pub username: String,
    /// Whether the account lives on this instance.
    pub local: bool,
}

/// Who is performing the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Viewer {
    /// Logged-out visitor.
    #[default]
    Anonymous,
    /// Logged-in account.
    Authenticated(Identity),
}

impl Viewer {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }
}

/// Privacy level of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Followers,
    Direct,
}

impl Visibility {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Followers => "followers",
            Self::Direct => "direct",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A book or edition as returned by the local catalog or a remote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Stable identifier, usually the record's URL.
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

/// An account returned by the account directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub username: String,
    pub localname: String,
    pub local: bool,
}

/// A list returned by the collection directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Username of the list owner.
    pub owner: String,
    pub visibility: Visibility,
}

/// A domain record carried by a [`ScoredResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Book(BookRecord),
    Account(AccountRecord),
    Collection(CollectionRecord),
}

impl Record {
    /// Identity key used to detect duplicates within a group.
    pub fn key(&self) -> String {
        match self {
            Self::Book(book) => book.key.clone(),
            Self::Account(account) => account.username.clone(),
            Self::Collection(list) => list.id.to_string(),
        }
    }
}

/// A record with the similarity score used to order it within its group.
///
/// Similarity is only meaningful inside one group; it is never compared
/// across domains or groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub record: Record,
    /// Fuzzy match score in `[0, 1]` (higher is better).
    pub similarity: f64,
}

impl ScoredResult {
    pub fn new(record: Record, similarity: f64) -> Self {
        Self { record, similarity }
    }
}

/// Results from a single source, ordered by descending similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultGroup {
    /// Where the results came from (local label or remote source name).
    pub source: String,
    pub results: Vec<ScoredResult>,
}

impl SearchResultGroup {
    pub fn new(source: impl Into<String>, results: Vec<ScoredResult>) -> Self {
        Self {
            source: source.into(),
            results,
        }
    }

    /// An empty group, used when a source failed or timed out.
    pub fn empty(source: impl Into<String>) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// Ordered groups produced by one dispatch.
///
/// For books: the local group first, then one group per remote source in
/// provider priority order. User and list searches produce one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResultSet {
    groups: Vec<SearchResultGroup>,
}

impl SearchResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: SearchResultGroup) {
        self.groups.push(group);
    }

    pub fn extend(&mut self, groups: impl IntoIterator<Item = SearchResultGroup>) {
        self.groups.extend(groups);
    }

    pub fn groups(&self) -> &[SearchResultGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<SearchResultGroup> {
        self.groups
    }

    /// Total number of results across all groups.
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(SearchResultGroup::len).sum()
    }

    /// True when no group holds any result.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(SearchResultGroup::is_empty)
    }
}
