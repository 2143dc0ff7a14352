//! Error types and handling for nook-core operations.
//!
//! A single error type covers every failure in the search pipeline and the icon
//! cache. Errors are categorized for logging and carry a recoverability hint so
//! callers can decide whether a later refresh is worth attempting.
//!
//! ## Error Categories
//!
//! - **Network Errors**: transport failures and timeouts talking to the search API
//! - **API Errors**: non-success responses from the search endpoint
//! - **Serialization Errors**: malformed JSON payloads
//! - **Normalization Errors**: a single search result that cannot become a page record
//! - **Cache Errors**: icon cache directory failures
//! - **Storage Errors**: snapshot persistence failures
//! - **Configuration Errors**: missing or invalid settings
//!
//! ## Fatal vs per-item failures
//!
//! Only some of these abort an operation. A failed page request aborts the whole
//! search, while a normalization error or a failed icon download is logged and the
//! batch continues:
//!
//! ```rust
//! use nook_core::Error;
//!
//! let err = Error::Normalize("result without an id".to_string());
//! assert_eq!(err.category(), "normalize");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for nook-core operations.
///
/// All public functions in nook-core return `Result<T, Error>`. The error keeps
/// the source chain of wrapped I/O and HTTP errors.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers raw file system operations that are not attributed to the icon
    /// cache or the snapshot store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers connection failures, timeouts and body decoding errors raised by
    /// `reqwest` while talking to the search API or downloading icons.
    ///
    /// ## Recoverability
    ///
    /// Connection and timeout errors are recoverable; a later refresh may succeed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The search API answered with a non-success status.
    ///
    /// `message` carries the API's own error message when the body contained one.
    ///
    /// ## Common Causes
    ///
    /// - Invalid or revoked integration secret (401)
    /// - Rate limiting (429)
    /// - Upstream outage (5xx)
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Error message reported by the endpoint, or the status reason.
        message: String,
    },

    /// Serialization or deserialization failed.
    ///
    /// Raised for malformed JSON responses and for snapshot files that cannot
    /// be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The search endpoint broke off pagination.
    ///
    /// Raised when a continuation page comes back empty, or when a page claims
    /// more results without a cursor to fetch them. The partial list is discarded.
    #[error("Incomplete search pagination: {0}")]
    Pagination(String),

    /// A single search result could not be normalized into a page record.
    ///
    /// Never fatal to a batch: the offending result is skipped and logged.
    #[error("Normalization error: {0}")]
    Normalize(String),

    /// Icon cache directory operation failed.
    ///
    /// Raised when the cache directory cannot be created or enumerated, or a
    /// stale icon cannot be removed; these abort the sync. A single icon that
    /// cannot be written is counted as failed instead.
    #[error("Icon cache error: {0}")]
    Cache(String),

    /// Snapshot storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    ///
    /// ## Common Causes
    ///
    /// - No integration secret configured
    /// - Invalid TOML syntax in the settings file
    /// - Config directory cannot be determined
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable by retrying later.
    ///
    /// Returns `true` for transient failures: network timeouts and connection
    /// errors, rate limiting and server-side API errors, and interrupted I/O.
    ///
    /// ```rust
    /// use nook_core::Error;
    ///
    /// let throttled = Error::Api { status: 429, message: "rate limited".into() };
    /// assert!(throttled.is_recoverable());
    ///
    /// let unauthorized = Error::Api { status: 401, message: "API token is invalid.".into() };
    /// assert!(!unauthorized.is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful as a structured logging field:
    ///
    /// - `"io"`, `"network"`, `"api"`, `"serialization"`, `"pagination"`, `"normalize"`,
    ///   `"cache"`, `"storage"`, `"config"`, `"other"`
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Api { .. } => "api",
            Self::Serialization(_) => "serialization",
            Self::Pagination(_) => "pagination",
            Self::Normalize(_) => "normalize",
            Self::Cache(_) => "cache",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let cases = vec![
            (Error::Serialization("bad json".into()), "Serialization error"),
            (Error::Normalize("no id".into()), "Normalization error"),
            (Error::Pagination("no cursor".into()), "Incomplete search pagination"),
            (Error::Cache("read only".into()), "Icon cache error"),
            (Error::Storage("disk full".into()), "Storage error"),
            (Error::Config("missing secret".into()), "Configuration error"),
        ];

        for (error, prefix) in cases {
            let rendered = error.to_string();
            assert!(rendered.starts_with(prefix), "unexpected display: {rendered}");
        }

        assert_eq!(Error::Other("plain".into()).to_string(), "plain");
    }

    #[test]
    fn test_api_error_display_includes_status() {
        let err = Error::Api {
            status: 401,
            message: "API token is invalid.".into(),
        };
        assert_eq!(err.to_string(), "API error (401): API token is invalid.");
    }

    #[test]
    fn test_error_from_io_error() {
        let error: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        match error {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("Expected IO error variant, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: Error = parse_err.into();
        assert_eq!(error.category(), "serialization");
    }

    #[test]
    fn test_error_categories() {
        let categories = vec![
            (Error::Io(io::Error::other("test")), "io"),
            (
                Error::Api {
                    status: 500,
                    message: "test".into(),
                },
                "api",
            ),
            (Error::Serialization("test".into()), "serialization"),
            (Error::Pagination("test".into()), "pagination"),
            (Error::Normalize("test".into()), "normalize"),
            (Error::Cache("test".into()), "cache"),
            (Error::Storage("test".into()), "storage"),
            (Error::Config("test".into()), "config"),
            (Error::Other("test".into()), "other"),
        ];

        for (error, expected) in categories {
            assert_eq!(error.category(), expected);
        }
    }

    #[test]
    fn test_error_recoverability() {
        assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "t")).is_recoverable());
        assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "i")).is_recoverable());
        assert!(
            Error::Api {
                status: 503,
                message: "unavailable".into()
            }
            .is_recoverable()
        );

        assert!(!Error::Io(io::Error::new(io::ErrorKind::NotFound, "n")).is_recoverable());
        assert!(
            !Error::Api {
                status: 400,
                message: "bad request".into()
            }
            .is_recoverable()
        );
        assert!(!Error::Config("no secret".into()).is_recoverable());
        assert!(!Error::Cache("read only".into()).is_recoverable());
    }

    #[test]
    fn test_error_chain_source() {
        let error: Error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied").into();
        let source = std::error::Error::source(&error);
        assert!(source.unwrap().to_string().contains("access denied"));
    }
}
