//! Search domain inference and remote handle detection.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::SearchDomain;

/// `@?localname@domain.tld`, anchored at the start of the query.
const FULL_HANDLE_PATTERN: &str = r"^@?[a-zA-Z_\-\.0-9]+@[a-zA-Z_\-\.0-9]+\.[a-z]{2,}\b";

static FULL_HANDLE: OnceLock<Regex> = OnceLock::new();

fn full_handle_regex() -> &'static Regex {
    FULL_HANDLE.get_or_init(|| {
        Regex::new(FULL_HANDLE_PATTERN).expect("full handle pattern compiles")
    })
}

/// Pick the domain for a request.
///
/// - a recognised explicit domain wins
/// - an explicit but unrecognised domain falls back to [`SearchDomain::Book`]
/// - a blank explicit domain (`type=`) counts as no domain
/// - with no explicit domain, a query containing `@` is a user search
/// - everything else is a book search
pub fn infer_domain(explicit: Option<&str>, query: &str) -> SearchDomain {
    match explicit.filter(|param| !param.trim().is_empty()) {
        Some(param) => SearchDomain::from_param(Some(param)).unwrap_or_default(),
        None if !query.is_empty() && query.contains('@') => SearchDomain::User,
        None => SearchDomain::Book,
    }
}

/// Whether `query` starts with a complete `localname@domain` account handle,
/// i.e. something a remote-identity lookup could resolve.
pub fn is_full_handle(query: &str) -> bool {
    full_handle_regex().is_match(query)
}
