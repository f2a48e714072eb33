//! Text and link extraction from node label HTML.

use regex::Regex;
use std::sync::OnceLock;

fn text_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<a[^>]*>([^<]*)</a>|<p[^>]*>([^>]*)</p>").expect("valid text pattern")
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<a[^>]*href="([^"]*)"[^>]*>[^<]*</a>"#).expect("valid url pattern")
    })
}

/// Extract the visible text of a node label.
///
/// Collects the content of every `<a>` element and of `<p>` elements whose
/// body holds no markup, in document order, joined by single spaces.
pub fn get_text(html: &str) -> String {
    text_pattern()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The `href` of the first link in a node label, or an empty string.
pub fn get_url(html: &str) -> String {
    url_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
