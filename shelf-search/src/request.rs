//! Search requests as they arrive from callers and responses as they leave.

use serde::{Deserialize, Serialize};

use crate::classify::{infer_domain, Query};
use crate::orchestrator::DispatchOutcome;
use crate::types::{SearchDomain, SearchResultGroup, SearchResultSet, Viewer};

/// Raw search parameters, shaped like a query string
/// (`?q=...&type=user&min_confidence=0.5&remote=true&page=2`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub domain: Option<String>,
    pub min_confidence: Option<String>,
    pub remote: Option<String>,
    pub page: Option<String>,
}

impl SearchParams {
    /// Classify the query and build a request for `viewer`.
    ///
    /// - a missing query becomes the empty query
    /// - `min_confidence` that is missing, unparsable or negative is left
    ///   unset so the dispatcher default applies
    /// - any non-empty `remote` value requests remote search, but only for
    ///   authenticated viewers
    /// - a `page` that is not an integer means the first page
    pub fn into_request(self, viewer: Viewer) -> SearchRequest {
        let query = Query::parse(self.q.as_deref().unwrap_or_default());
        let domain = infer_domain(self.domain.as_deref(), &query.raw);
        let min_confidence = self
            .min_confidence
            .as_deref()
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0);
        let remote_requested =
            self.remote.is_some_and(|value| !value.is_empty()) && viewer.is_authenticated();
        let page = self
            .page
            .as_deref()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(1);

        SearchRequest {
            query,
            domain,
            min_confidence,
            viewer,
            remote_requested,
            page,
        }
    }
}

/// One classified search, immutable for the duration of a dispatch.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: Query,
    pub domain: SearchDomain,
    /// Book-domain confidence floor. `None` uses the dispatcher default.
    pub min_confidence: Option<f64>,
    pub viewer: Viewer,
    /// Caller asked for remote sources even if local results exist.
    pub remote_requested: bool,
    /// Requested result page, 1-based. Out-of-range values land on the last
    /// page.
    pub page: i64,
}

impl SearchRequest {
    /// Classify `raw` and infer its domain; no remote request, default
    /// confidence.
    pub fn new(raw: &str, viewer: Viewer) -> Self {
        let query = Query::parse(raw);
        let domain = infer_domain(None, &query.raw);
        Self {
            query,
            domain,
            min_confidence: None,
            viewer,
            remote_requested: false,
            page: 1,
        }
    }

    pub fn with_domain(mut self, domain: SearchDomain) -> Self {
        self.domain = domain;
        self
    }

    /// Set the confidence floor. Negative and non-finite values are ignored.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        if min_confidence.is_finite() && min_confidence >= 0.0 {
            self.min_confidence = Some(min_confidence);
        }
        self
    }

    pub fn with_remote(mut self, remote_requested: bool) -> Self {
        self.remote_requested = remote_requested;
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }
}

/// What the presentation layer receives.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(rename = "type")]
    pub domain: SearchDomain,
    /// Whether remote sources were searched. A book search always reports
    /// what the dispatch did; user and list searches without results echo
    /// what was asked for.
    pub remote: bool,
    /// One page of results: whole groups for books, records of the single
    /// group for users and lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<SearchResultSet>,
    pub page: usize,
    pub page_count: usize,
}

impl SearchResponse {
    /// Build the response for `request`, cutting the results to the
    /// requested page of `page_length` entries.
    pub fn new(request: &SearchRequest, outcome: DispatchOutcome, page_length: usize) -> Self {
        let requested = request.remote_requested && request.viewer.is_authenticated();
        let query = request.query.normalized.clone();
        let domain = request.domain;

        let remote = match domain {
            _ if request.query.is_blank() => requested,
            SearchDomain::Book => outcome.remote_searched,
            _ if outcome.results.is_empty() => requested,
            _ => outcome.remote_searched,
        };

        if outcome.results.is_empty() {
            return Self {
                query,
                domain,
                remote,
                results: None,
                page: 1,
                page_count: 1,
            };
        }

        let (results, page) = paginate_results(domain, outcome.results, request.page, page_length);
        Self {
            query,
            domain,
            remote,
            results: Some(results),
            page: page.number,
            page_count: page.count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageInfo {
    number: usize,
    count: usize,
}

fn paginate_results(
    domain: SearchDomain,
    results: SearchResultSet,
    page: i64,
    page_length: usize,
) -> (SearchResultSet, PageInfo) {
    let mut paged = SearchResultSet::new();
    match domain {
        SearchDomain::Book => {
            let (groups, info) = paginate(results.into_groups(), page, page_length);
            paged.extend(groups);
            (paged, info)
        }
        SearchDomain::User | SearchDomain::List => {
            let mut info = PageInfo { number: 1, count: 1 };
            for group in results.into_groups() {
                let (records, group_info) = paginate(group.results, page, page_length);
                info = group_info;
                paged.push(SearchResultGroup::new(group.source, records));
            }
            (paged, info)
        }
    }
}

/// Slice `items` into pages of `page_length`. There is always at least one
/// page; a page number below 1 or past the end selects the last page.
fn paginate<T>(items: Vec<T>, page: i64, page_length: usize) -> (Vec<T>, PageInfo) {
    let page_length = page_length.max(1);
    let count = items.len().div_ceil(page_length).max(1);
    let number = usize::try_from(page)
        .ok()
        .filter(|n| (1..=count).contains(n))
        .unwrap_or(count);
    let start = (number - 1) * page_length;
    let slice = items.into_iter().skip(start).take(page_length).collect();
    (slice, PageInfo { number, count })
}
