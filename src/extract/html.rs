// src/extract/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We deliberately do NOT build a DOM. A single regex pass finds every
// `<a ... href=...>` and captures the href value, which means:
// - broken or half-finished markup never makes us fail
// - quoted ('...' or "...") and unquoted (href=/foo) values both work
// - other attributes and whitespace around href are ignored
//
// For each captured value:
// 1. Decode HTML entities (&amp; -> &), then trim whitespace; drop if empty
// 2. Skip #fragments, javascript:, mailto:, tel: and data: (any case)
// 3. Resolve against the page URL with the `url` crate (relative paths,
//    //host/path and absolute URLs all work); drop on failure
// 4. Keep only http/https results
// 5. Add to the LinkSet, which drops case-insensitive duplicates
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::link_set::LinkSet;
use crate::target::TargetUrl;

// Attributes before href are skipped a quoted value at a time, so a
// `>` or `href=` inside another attribute's value is never mistaken for markup.
// Group 1: "double quoted", group 2: 'single quoted', group 3: unquoted
static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<a\s(?:(?:[^>"']|"[^"]*"|'[^']*')*?\s)?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>`]+))"#,
    )
    .expect("anchor regex is valid")
});

// Prefixes of href values that never point at a web page
const SKIPPED_PREFIXES: [&str; 5] = ["#", "javascript:", "mailto:", "tel:", "data:"];

// Extracts all absolute http/https links from HTML content
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base = "https://example.com/dir/"
//   result = ["https://example.com/docs"]
pub fn extract(html: &str, base: &TargetUrl) -> LinkSet {
    let mut links = LinkSet::new();

    for href in raw_hrefs(html) {
        if let Some(url) = resolve_href(base.as_url(), &href) {
            links.insert(url);
        }
    }

    links
}

// Every href value from an <a> tag, entity-decoded and trimmed, in
// document order. Empty values are dropped; nothing else is filtered.
pub fn raw_hrefs(html: &str) -> Vec<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| html_escape::decode_html_entities(m.as_str()).trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

// Turns one href into an absolute http(s) URL, or None if it should be left out
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    if is_skipped_reference(href) {
        return None;
    }

    // join() handles relative, protocol-relative and absolute references
    let url = base.join(href).ok()?;

    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

fn is_skipped_reference(href: &str) -> bool {
    SKIPPED_PREFIXES.iter().any(|prefix| {
        href.get(..prefix.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a regex instead of a real HTML parser?
//    - We only need one attribute of one tag
//    - A regex keeps going through markup a parser might choke on
//    - It also keeps extraction a simple text-in, set-out function
//
// 2. What is Lazy<Regex>?
//    - Compiling a regex is expensive, matching with it is cheap
//    - Lazy compiles it the first time it's used, then reuses it forever
//
// 3. Why `.get(..prefix.len())` instead of slicing with [..]?
//    - Slicing panics if the index lands inside a multi-byte character
//    - .get() returns None instead, which we treat as "no match"
//
// 4. What does base.join(href) do?
//    - It resolves href the way a browser would
//    - "/page" on https://example.com/dir/ -> https://example.com/page
//    - "//cdn.com/x" -> https://cdn.com/x (keeps the base scheme)
//    - "https://other.com" -> https://other.com/ (already absolute)
// -----------------------------------------------------------------------------
