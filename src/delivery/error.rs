//! Error types for delivery-endpoint and CDN operations.
//!
//! The taxonomy keeps the four failure families distinct because they mean
//! different things to an operator reading the index afterwards:
//! permission denials, protocol surprises (a header the server always sends
//! is missing or malformed), plain HTTP status failures, and the special
//! "resolved but absent from the CDN" case.

use thiserror::Error;

/// Errors raised while resolving or fetching asset content.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The delivery endpoint denied access outright (HTTP 409).
    #[error("insufficient permissions to download asset")]
    Permission,

    /// Unhandled HTTP status from the delivery endpoint or CDN.
    ///
    /// `body` carries the response text when the failing request was a URL
    /// resolution, where the endpoint explains itself in the payload.
    #[error("unhandled status code ({status}){}", .body.as_deref().map(|b| format!(" ({b})")).unwrap_or_default())]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Response body text, when captured.
        body: Option<String>,
    },

    /// An expected response header is absent.
    #[error("{header} header is missing")]
    MissingHeader {
        /// The header that should have been present.
        header: &'static str,
    },

    /// An expected response header exists but does not parse.
    #[error("{header} header is non-numeric")]
    MalformedHeader {
        /// The header that failed to parse.
        header: &'static str,
    },

    /// The asset resolved to a CDN URL but the CDN answered 403.
    #[error("asset not found on CDN")]
    NotFoundOnCdn,

    /// The request exceeded the configured timeout.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Transport-level failure (DNS, connection, TLS, ...).
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be constructed from the configuration.
    #[error("HTTP client construction failed: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl DeliveryError {
    /// Creates a status error without body context.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self::Status { status, body: None }
    }

    /// Creates a status error carrying the response body text.
    #[must_use]
    pub fn status_with_body(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: Some(body.into()),
        }
    }

    /// Classifies a transport error, separating timeouts from other failures.
    pub fn from_transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }
}
