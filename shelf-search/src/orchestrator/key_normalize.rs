//! Record key normalisation for duplicate detection.
//!
//! Book keys are usually URLs (`https://Books.example/book/12/`), account keys
//! are handles (`@Alice@example.com`). Equivalent keys that differ only in
//! capitalisation, default ports, fragments, trailing slashes or query order
//! compare as equal after normalisation.

use url::Url;

use crate::types::Record;

/// Normalise the identity key of `record`.
pub fn normalize_key(record: &Record) -> String {
    match record {
        Record::Book(book) => normalize_url(&book.key),
        Record::Account(account) => normalize_handle(&account.username),
        Record::Collection(list) => list.id.to_string(),
    }
}

/// Normalise a URL key.
///
/// 1. Lowercase scheme and host (path is preserved as-is).
/// 2. Remove default ports (`:80` for HTTP, `:443` for HTTPS).
/// 3. Sort query parameters by key.
/// 4. Remove the fragment.
/// 5. Remove a trailing slash from the path (unless the path is `/`).
///
/// Keys that do not parse as URLs are returned unchanged.
///
/// # Examples
///
/// ```
/// use shelf_search::orchestrator::key_normalize::normalize_url;
///
/// let a = normalize_url("https://Books.Example/book/12/?b=2&a=1#editions");
/// let b = normalize_url("https://books.example/book/12?a=1&b=2");
/// assert_eq!(a, b);
/// ```
pub fn normalize_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    if is_default_port(&parsed) {
        let _ = parsed.set_port(None);
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if params.is_empty() {
        parsed.set_query(None);
    } else {
        params.sort();
        parsed.query_pairs_mut().clear().extend_pairs(params);
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(&path[..path.len() - 1]);
    }

    parsed.to_string()
}

/// Normalise an account handle: drop a leading `@`, lowercase the domain.
/// The local part keeps its case.
pub fn normalize_handle(raw: &str) -> String {
    let handle = raw.trim().trim_start_matches('@');
    match handle.split_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => handle.to_string(),
    }
}

fn is_default_port(url: &Url) -> bool {
    matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    )
}
