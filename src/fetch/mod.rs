// src/fetch/mod.rs
// =============================================================================
// This module downloads a single HTML document.
//
// Submodules:
// - config: timeout and client identification settings
// - client: the Fetcher itself (one GET per call, cancellable)
// - error: how a failed fetch is classified
//
// The Fetcher wraps one reqwest::Client. It is built once at startup and
// then only read, so every operation can share it.
// =============================================================================

mod client;
mod config;
mod error;

pub use client::{Fetcher, ACCEPT_HTML};
pub use config::{FetchConfig, DEFAULT_TIMEOUT};
pub use error::{FetchError, FetchErrorKind};
