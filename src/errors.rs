//! Error types for quakemap.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur while loading and rendering the feed.
#[derive(Error, Debug)]
pub enum QuakemapError {
    /// Transport-level failure talking to the feed
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Feed body was not valid GeoJSON
    #[error("failed to parse feed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Feed returned an error status
    #[error("USGS feed error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Well-formed JSON with the wrong shape
    #[error("invalid feed response: {0}")]
    InvalidResponse(String),

    /// Local file input or output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuakemapError {
    /// Short category used in logs and the error page headline.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network error",
            Self::Parse(_) | Self::InvalidResponse(_) => "parse error",
            Self::Api { .. } => "feed unavailable",
            Self::Io(_) => "I/O error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_parse_failures() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(QuakemapError::from(bad).kind(), "parse error");
        assert_eq!(
            QuakemapError::InvalidResponse("x".into()).kind(),
            "parse error"
        );
    }

    #[test]
    fn test_api_error_message() {
        let err = QuakemapError::Api {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.to_string(), "USGS feed error (HTTP 503): down");
        assert_eq!(err.kind(), "feed unavailable");
    }
}
