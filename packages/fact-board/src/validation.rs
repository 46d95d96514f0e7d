//! Input predicates for fact submissions.
//!
//! These never fail: a malformed value is simply a `false`.

use url::Url;

use crate::catalog;

/// Maximum fact length, in characters.
pub const MAX_FACT_LENGTH: usize = 200;

/// True when `s` parses as an absolute `http` or `https` URL.
pub fn is_valid_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Gate for submissions: non-empty text of at most [`MAX_FACT_LENGTH`]
/// characters, a valid source URL, and a catalog category.
pub fn is_valid_fact_input(text: &str, source: &str, category: &str) -> bool {
    let len = text.chars().count();
    len > 0
        && len <= MAX_FACT_LENGTH
        && is_valid_url(source)
        && !category.is_empty()
        && catalog::contains(category)
}

/// Characters left before the text hits the limit.
pub fn remaining_chars(text: &str) -> usize {
    MAX_FACT_LENGTH.saturating_sub(text.chars().count())
}
