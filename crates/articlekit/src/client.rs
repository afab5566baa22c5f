//! Convenience entry points for ArticleKit
//!
//! These build a default [`Extractor`] per call. Long-lived callers such as
//! servers should build one [`Extractor`] and share it.

use crate::error::ExtractError;
use crate::extractor::Extractor;
use crate::types::{Extraction, ExtractionRequest, RawDocument};

/// Fetch options that can be configured via the extractor builder
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
}

/// Fetch a URL and extract its article with default settings
///
/// For custom options, use [`extract_with_options`].
pub async fn extract(req: ExtractionRequest) -> Result<Extraction, ExtractError> {
    extract_with_options(req, FetchOptions::default()).await
}

/// Fetch a URL and extract its article with custom fetch options
pub async fn extract_with_options(
    req: ExtractionRequest,
    options: FetchOptions,
) -> Result<Extraction, ExtractError> {
    if req.url.is_empty() {
        return Err(ExtractError::MissingUrl);
    }

    let mut builder = Extractor::builder();
    if let Some(ua) = options.user_agent {
        builder = builder.user_agent(ua);
    }
    builder.build().extract(req).await
}

/// Extract an article from HTML that is already in hand
///
/// `url` is only used for canonical link and domain fallbacks.
pub async fn extract_html(
    url: impl Into<String>,
    html: impl Into<String>,
) -> Result<Extraction, ExtractError> {
    Extractor::default()
        .extract_document(RawDocument::new(url, html))
        .await
}
