use crate::index::{InvertedIndex, Posting};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // A term is either a double-quoted run (quotes stripped afterwards) or
    // a maximal run of non-space, non-quote characters.
    static ref TERM_RE: Regex = Regex::new(r#""[^"]*"|[^" ]+"#).expect("valid regex");
}

/// Parses free-text query input into terms, left to right. The whole query
/// is lowercased first, so words and phrases both match case-insensitively.
/// A quoted phrase stays one term with its internal spaces intact.
pub fn parse_query(query_text: &str) -> Vec<String> {
    let lowered = query_text.to_lowercase();
    TERM_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().trim_matches('"').to_string())
        .collect()
}

/// Strict boolean-AND search: the result is the intersection of the
/// posting sets of every term. A term absent from the index contributes an
/// empty set and therefore zeroes the result, whatever its position. An
/// empty term list matches nothing.
pub fn search_postings(index: &InvertedIndex, query_text: &str) -> Vec<Posting> {
    let mut matched: Option<HashSet<Posting>> = None;
    for term in parse_query(query_text) {
        let postings = index.postings_for(&term).cloned().unwrap_or_default();
        matched = Some(match matched {
            None => postings,
            Some(acc) => acc.intersection(&postings).cloned().collect(),
        });
        if matched.as_ref().is_some_and(|m| m.is_empty()) {
            break;
        }
    }
    matched.map(|m| m.into_iter().collect()).unwrap_or_default()
}

/// Titles of all movies matching every query term. Order is unspecified.
pub fn search(index: &InvertedIndex, query_text: &str) -> Vec<String> {
    search_postings(index, query_text)
        .into_iter()
        .map(|p| p.title)
        .collect()
}
