//! Link detection for raw user input.
//!
//! Decides whether a line of input is a keyword query or a list of explicit
//! URLs. Matching is purely lexical: `http://` or `https://` followed by one
//! or more characters from a fixed allowed set. No deduplication and no
//! check that a match resolves to a live host.

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters, digits, `$-_@.&+!*(),` and percent-escapes. Note `$-_` is a
/// range, which is what admits `/`, `:`, `?` and `=` inside paths.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
        .unwrap()
});

/// Classify `input` and pull out any URLs it contains.
///
/// Returns `(true, links)` iff at least one URL-shaped substring is found;
/// `links` holds all non-overlapping matches in left-to-right order.
pub fn detect(input: &str) -> (bool, Vec<String>) {
    let links: Vec<String> = URL_RE
        .find_iter(input)
        .map(|m| m.as_str().to_string())
        .collect();
    (!links.is_empty(), links)
}
