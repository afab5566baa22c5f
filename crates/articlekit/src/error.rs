//! Error types for ArticleKit

use thiserror::Error;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is missing
    #[error("Missing URL parameter")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Connect or body read exceeded its deadline
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server: {0}")]
    ConnectError(String),

    /// Server answered with a non-success status
    #[error("{status} for url: {url}")]
    HttpStatus { status: u16, url: String },

    /// Response is not a text document
    #[error("Binary content is not supported: {0}")]
    BinaryContent(String),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectError(err.to_string())
        } else {
            FetchError::RequestError(err.to_string())
        }
    }

    /// True when the target could not be reached at all
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Timeout | FetchError::ConnectError(_))
    }
}

/// Errors raised by a document analyzer
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Nothing but whitespace was handed in
    #[error("document is empty")]
    EmptyDocument,

    /// Strict parsing rejected the markup
    #[error("malformed HTML: {0}")]
    Malformed(String),

    /// The analyzer task did not finish
    #[error("analysis aborted: {0}")]
    Aborted(String),
}

/// Errors that abort an extraction request
///
/// Analyzer failures are not in here: they are part of a successful
/// [`Extraction`](crate::Extraction) and reach the caller as an error body.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Request carried no URL
    #[error("Missing URL parameter")]
    MissingUrl,

    /// Fetch failed at the HTTP level
    #[error("HTTP error: {0}")]
    Http(#[source] FetchError),

    /// Target unreachable
    #[error("Network error: {0}")]
    Network(#[source] FetchError),

    /// Anything else
    #[error("Error: {0}")]
    Unclassified(String),
}

impl ExtractError {
    /// HTTP status to report this error with
    pub fn status_code(&self) -> u16 {
        match self {
            ExtractError::MissingUrl => 400,
            _ => 500,
        }
    }
}

impl From<FetchError> for ExtractError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::MissingUrl => ExtractError::MissingUrl,
            FetchError::BinaryContent(_) => ExtractError::Unclassified(err.to_string()),
            err if err.is_network() => ExtractError::Network(err),
            err => ExtractError::Http(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::MissingUrl.to_string(), "Missing URL parameter");
        assert_eq!(
            FetchError::InvalidUrlScheme.to_string(),
            "Invalid URL: must start with http:// or https://"
        );
        assert_eq!(FetchError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            FetchError::HttpStatus {
                status: 404,
                url: "https://example.com/a".to_string()
            }
            .to_string(),
            "404 for url: https://example.com/a"
        );
        assert_eq!(
            AnalysisError::EmptyDocument.to_string(),
            "document is empty"
        );
    }

    #[test]
    fn test_extract_error_categories() {
        let err = ExtractError::from(FetchError::Timeout);
        assert!(matches!(err, ExtractError::Network(_)));
        assert_eq!(err.to_string(), "Network error: Request timed out");

        let err = ExtractError::from(FetchError::ConnectError("refused".to_string()));
        assert!(matches!(err, ExtractError::Network(_)));

        let err = ExtractError::from(FetchError::InvalidUrlScheme);
        assert_eq!(
            err.to_string(),
            "HTTP error: Invalid URL: must start with http:// or https://"
        );

        let err = ExtractError::from(FetchError::BinaryContent("image/png".to_string()));
        assert_eq!(
            err.to_string(),
            "Error: Binary content is not supported: image/png"
        );

        let err = ExtractError::from(FetchError::MissingUrl);
        assert!(matches!(err, ExtractError::MissingUrl));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ExtractError::MissingUrl.status_code(), 400);
        assert_eq!(ExtractError::from(FetchError::Timeout).status_code(), 500);
        assert_eq!(
            ExtractError::Unclassified("boom".to_string()).status_code(),
            500
        );
    }
}
