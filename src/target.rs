// src/target.rs
// =============================================================================
// This module turns whatever the user typed into a Target URL.
//
// A Target URL is always:
// - absolute
// - http or https
//
// The rules for building one from raw input:
// 1. Trim surrounding whitespace
// 2. If the text doesn't start with http:// or https:// (any case),
//    put https:// in front of it
// 3. Parse it with the `url` crate
//
// Anything that fails here is reported before we touch the network.
// =============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use url::Url;

// Errors produced while building a Target URL from user input
#[derive(Debug, Error)]
pub enum InvalidUrlError {
    #[error("no URL given")]
    Empty,

    #[error("invalid URL '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme '{0}' (only http and https can be fetched)")]
    UnsupportedScheme(String),
}

/// A validated absolute `http`/`https` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TargetUrl(Url);

impl TargetUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl TryFrom<Url> for TargetUrl {
    type Error = InvalidUrlError;

    fn try_from(url: Url) -> Result<Self, Self::Error> {
        match url.scheme() {
            "http" | "https" => Ok(TargetUrl(url)),
            other => Err(InvalidUrlError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

// Normalizes raw user input into a Target URL
//
// Examples:
//   "wikipedia.org"            -> https://wikipedia.org/
//   "  http://example.com/a  " -> http://example.com/a
//   "HTTPS://Example.COM"      -> https://example.com/
//   "   "                      -> Err(Empty)
pub fn normalize_input(raw: &str) -> Result<TargetUrl, InvalidUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidUrlError::Empty);
    }

    let candidate = if has_http_prefix(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|source| InvalidUrlError::Parse {
        input: trimmed.to_string(),
        source,
    })?;

    TargetUrl::try_from(url)
}

// Case-insensitive check for an explicit http:// or https:// prefix
fn has_http_prefix(input: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        input
            .get(..prefix.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
    })
}
