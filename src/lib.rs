// src/lib.rs
// =============================================================================
// link-harvest: fetch one HTML page, list the absolute http(s) links in it.
//
// Pipeline:
//   normalize_input(raw)       -> TargetUrl     (target)
//   Fetcher::fetch(url, token) -> HTML text     (fetch)
//   extract(html, url)         -> LinkSet       (extract)
//
// session ties the three together as cancellable operations.
// =============================================================================

pub mod extract;
pub mod fetch;
pub mod session;
pub mod target;

pub use extract::{extract, LinkSet};
pub use fetch::{FetchConfig, FetchError, FetchErrorKind, Fetcher};
pub use session::{harvest, Harvest, OperationId, Outcome, Outcomes, Session};
pub use target::{normalize_input, InvalidUrlError, TargetUrl};
