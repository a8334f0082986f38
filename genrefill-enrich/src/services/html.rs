//! HTML scraping helpers
//!
//! Parsing happens in plain functions over `&str` so a parsed document never
//! lives across an `.await`.

use crate::types::LookupFailure;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Scraped labels this long or longer are page text, not genres
pub const MAX_LABEL_CHARS: usize = 30;

/// Parse a CSS selector
pub fn selector(css: &str) -> Result<Selector, LookupFailure> {
    Selector::parse(css).map_err(|e| LookupFailure::Parse(format!("selector {}: {}", css, e)))
}

/// Visible text of an element, whitespace-collapsed
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether an element's `class` attribute matches a pattern
pub fn class_matches(element: &ElementRef<'_>, pattern: &Regex) -> bool {
    element
        .value()
        .attr("class")
        .map(|class| pattern.is_match(class))
        .unwrap_or(false)
}

/// Whether scraped text looks like a usable label
pub fn is_label_text(text: &str, ignored: &[&str]) -> bool {
    if text.is_empty() || text.chars().count() >= MAX_LABEL_CHARS {
        return false;
    }
    let lower = text.to_lowercase();
    !ignored.contains(&lower.as_str())
}

/// Texts of elements matching `css` whose class matches `class_pattern`
///
/// Label words in `ignored` (lowercase) are skipped; duplicates are removed
/// keeping the first occurrence.
pub fn collect_classed_texts(
    html: &str,
    css: &str,
    class_pattern: &Regex,
    ignored: &[&str],
) -> Result<Vec<String>, LookupFailure> {
    let document = Html::parse_document(html);
    let elements = selector(css)?;

    let texts = document
        .select(&elements)
        .filter(|el| class_matches(el, class_pattern))
        .map(|el| element_text(&el))
        .filter(|text| is_label_text(text, ignored))
        .collect();

    Ok(dedup_keep_order(texts))
}

/// Remove duplicates keeping the first occurrence
pub fn dedup_keep_order(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// Resolve a possibly site-relative link against an origin like `https://dice.fm`
pub fn absolute_url(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", origin.trim_end_matches('/'), href)
    }
}
