// src/fetch/config.rs
// =============================================================================
// Settings for the HTTP client.
//
// Only two things are configurable: the overall request timeout and the
// User-Agent string. Everything else (Accept header, decompression) is fixed
// in client.rs.
// =============================================================================

use std::time::Duration;

/// Overall bound on one request, connect through last body byte.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl FetchConfig {
    // Default User-Agent, e.g. "link-harvest/0.1.0"
    pub fn default_user_agent() -> String {
        format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: Self::default_user_agent(),
        }
    }
}
