// src/extract/mod.rs
// =============================================================================
// This module pulls links out of HTML text.
//
// Submodules:
// - html: the lexical <a href=...> scanner, href filtering and resolution
// - link_set: an insertion-ordered, case-insensitively unique set of URLs
//
// Extraction is pure: same HTML + same base URL -> same LinkSet, every time.
// It never fails; anchors it can't make sense of are just left out.
// =============================================================================

mod html;
mod link_set;

pub use html::{extract, raw_hrefs};
pub use link_set::LinkSet;
