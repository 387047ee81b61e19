//! Text manipulation utilities.

use url::Url;

/// Title-cases text: the first letter of every run of letters is upper-cased, the rest lower-cased.
///
/// # Examples
///
/// ```
/// # use sitemap_ltx::text_utils::title_case;
/// assert_eq!(title_case("getting started"), "Getting Started");
/// assert_eq!(title_case("REST api v2"), "Rest Api V2");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Derives a page title from the last non-empty path segment of a URL:
/// `-` and `_` become spaces, then the result is title-cased.
/// Falls back to `"Page"` when there is no usable segment.
///
/// # Examples
///
/// ```
/// # use sitemap_ltx::text_utils::title_from_url;
/// assert_eq!(title_from_url("https://example.com/docs/quick_start-guide/"), "Quick Start Guide");
/// assert_eq!(title_from_url("https://example.com/"), "Page");
/// ```
pub fn title_from_url(url: &str) -> String {
    let segment = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(|s| s.to_string()))
    });

    match segment {
        Some(segment) => {
            let title = title_case(segment.replace(['-', '_'], " ").trim());
            if title.is_empty() { "Page".to_string() } else { title }
        }
        None => "Page".to_string(),
    }
}

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The text before the first `.`, trimmed and re-terminated with a `.`,
/// but only when it is longer than `min_chars` characters.
///
/// # Examples
///
/// ```
/// # use sitemap_ltx::text_utils::first_sentence;
/// assert_eq!(
///     first_sentence("This page explains authentication. More text.", 20),
///     Some("This page explains authentication.".to_string())
/// );
/// assert_eq!(first_sentence("Too short. Really.", 20), None);
/// ```
pub fn first_sentence(text: &str, min_chars: usize) -> Option<String> {
    let first = text.split('.').next()?.trim();
    if first.chars().count() > min_chars {
        Some(format!("{}.", first))
    } else {
        None
    }
}

/// Truncates to at most `max_chars` characters (not bytes).
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("hello world"), "Hello World");
        assert_eq!(title_case("hELLO"), "Hello");
        assert_eq!(title_case("v2 release notes"), "V2 Release Notes");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_from_url() {
        assert_eq!(title_from_url("https://example.com/api-reference"), "Api Reference");
        assert_eq!(title_from_url("https://example.com/docs/first_steps/"), "First Steps");
        assert_eq!(title_from_url("https://example.com/docs//"), "Docs");
        assert_eq!(title_from_url("https://example.com"), "Page");
        assert_eq!(title_from_url("https://example.com/---/"), "Page");
        assert_eq!(title_from_url("not a url"), "Page");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(
            first_sentence("Exactly twenty one ch. rest", 20),
            Some("Exactly twenty one ch.".to_string())
        );
        assert_eq!(first_sentence("Exactly twenty chars. rest", 20), None);
        assert_eq!(first_sentence("Short one here. tail", 10), Some("Short one here.".to_string()));
        assert_eq!(first_sentence("", 10), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
