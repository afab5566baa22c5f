//! Default HTTP fetcher
//!
//! Handles plain HTTP/HTTPS URLs with a browser-like user agent.

use crate::client::FetchOptions;
use crate::encoding::decode_body;
use crate::error::FetchError;
use crate::fetchers::Fetcher;
use crate::types::{ExtractionRequest, RawDocument};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Binary content type prefixes
const BINARY_PREFIXES: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/x-tar",
    "application/x-rar",
    "application/x-7z",
    "application/vnd.ms-",
    "application/vnd.openxmlformats",
    "font/",
];

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Body timeout (total)
const BODY_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,*/*;q=0.8";

/// Default HTTP fetcher
///
/// - GET only
/// - non-2xx statuses become [`FetchError::HttpStatus`]
/// - binary responses are refused
/// - body decoded using the declared charset
pub struct DefaultFetcher;

impl DefaultFetcher {
    /// Create a new default fetcher
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for DefaultFetcher {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn fetch(
        &self,
        request: &ExtractionRequest,
        options: &FetchOptions,
    ) -> Result<RawDocument, FetchError> {
        if request.url.is_empty() {
            return Err(FetchError::MissingUrl);
        }
        if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
            return Err(FetchError::InvalidUrlScheme);
        }
        Url::parse(&request.url).map_err(|_| FetchError::InvalidUrlScheme)?;

        let mut headers = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        debug!(url = %request.url, user_agent, "Sending request");
        let response = client
            .get(&request.url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Some(ref ct) = content_type {
            if is_binary_content_type(ct) {
                return Err(FetchError::BinaryContent(ct.clone()));
            }
        }

        let body = read_body_with_timeout(response, BODY_TIMEOUT).await?;
        debug!(url = %request.url, size = body.len(), "Body received");

        let html = decode_body(content_type.as_deref(), &body);
        Ok(RawDocument::new(request.url.clone(), html))
    }
}

/// Check if content type indicates binary content
fn is_binary_content_type(content_type: &str) -> bool {
    let ct_lower = content_type.to_lowercase();
    BINARY_PREFIXES
        .iter()
        .any(|prefix| ct_lower.starts_with(prefix))
}

/// Read the whole response body, failing once `timeout` has elapsed
async fn read_body_with_timeout(
    response: reqwest::Response,
    timeout: Duration,
) -> Result<Bytes, FetchError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let chunk_future = stream.next();
        let timeout_future = tokio::time::sleep_until(deadline);

        tokio::select! {
            chunk = chunk_future => {
                match chunk {
                    Some(Ok(bytes)) => {
                        body.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        warn!("Error reading body chunk: {}", e);
                        return Err(FetchError::from_reqwest(e));
                    }
                    None => {
                        return Ok(Bytes::from(body));
                    }
                }
            }
            _ = timeout_future => {
                warn!(received = body.len(), "Body timeout reached");
                return Err(FetchError::Timeout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_binary_content_type() {
        assert!(is_binary_content_type("image/png"));
        assert!(is_binary_content_type("image/jpeg"));
        assert!(is_binary_content_type("audio/mp3"));
        assert!(is_binary_content_type("video/mp4"));
        assert!(is_binary_content_type("application/pdf"));
        assert!(is_binary_content_type("application/octet-stream"));
        assert!(is_binary_content_type("application/vnd.ms-excel"));
        assert!(is_binary_content_type("font/woff2"));

        assert!(!is_binary_content_type("text/html"));
        assert!(!is_binary_content_type("text/html; charset=utf-8"));
        assert!(!is_binary_content_type("application/xhtml+xml"));
        assert!(!is_binary_content_type("text/plain"));
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let fetcher = DefaultFetcher::new();
        let req = ExtractionRequest::new("ftp://example.com/news");
        let result = fetcher.fetch(&req, &FetchOptions::default()).await;
        assert!(matches!(result, Err(FetchError::InvalidUrlScheme)));
    }

    #[tokio::test]
    async fn test_rejects_unparseable_url() {
        let fetcher = DefaultFetcher::new();
        let req = ExtractionRequest::new("http://");
        let result = fetcher.fetch(&req, &FetchOptions::default()).await;
        assert!(matches!(result, Err(FetchError::InvalidUrlScheme)));
    }

    #[tokio::test]
    async fn test_rejects_empty_url() {
        let fetcher = DefaultFetcher::new();
        let result = fetcher
            .fetch(&ExtractionRequest::new(""), &FetchOptions::default())
            .await;
        assert!(matches!(result, Err(FetchError::MissingUrl)));
    }
}
