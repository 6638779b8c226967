// src/fetch/error.rs
// =============================================================================
// Classification of fetch failures.
//
// The caller needs to tell these apart, because they are presented
// differently:
// - Network:    DNS failure, connection refused/reset, TLS, bad body bytes
// - Timeout:    the overall time limit ran out
// - Cancelled:  the caller gave up (or started a newer operation)
// - HttpStatus: the server answered, but not with 2xx
//
// Cancelled is not really a failure from the user's point of view; it maps
// to a quiet "aborted" status instead of an error message.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("server responded with HTTP {0}")]
    HttpStatus(u16),
}

/// Data-free mirror of [`FetchError`] for reports and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Network,
    Timeout,
    Cancelled,
    HttpStatus,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Timeout => FetchErrorKind::Timeout,
            FetchError::Cancelled => FetchErrorKind::Cancelled,
            FetchError::HttpStatus(_) => FetchErrorKind::HttpStatus,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

// reqwest reports timeouts as ordinary errors with a flag set;
// pull those out so they don't look like transport failures
impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(error)
        }
    }
}
