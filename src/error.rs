//! Typed errors for fetching and discovery.
//!
//! Batch fetching never returns these to its caller: a failed page is logged
//! and left out of the batch. They surface from single-page fetches and from
//! search discovery.

use thiserror::Error;

/// Why a single page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Any other page-source failure.
    #[error("source failed for {url}: {reason}")]
    Source { url: String, reason: String },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request(e) if e.is_timeout())
    }
}

/// Why a search query could not be turned into candidate URLs.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search engine answered with status {status}")]
    Status { status: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "unexpected status 503 for https://example.com");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_source_error_message() {
        let err = FetchError::Source {
            url: "https://example.com".to_string(),
            reason: "connection reset".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "source failed for https://example.com: connection reset"
        );
    }
}
