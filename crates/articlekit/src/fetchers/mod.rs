//! Fetcher system for retrieving raw HTML
//!
//! Design: the pipeline only depends on the [`Fetcher`] trait, so the
//! transport can be swapped (tests, proxies) without touching extraction.

mod default;

pub use default::DefaultFetcher;

use crate::client::FetchOptions;
use crate::error::FetchError;
use crate::types::{ExtractionRequest, RawDocument};
use async_trait::async_trait;

/// Trait for HTML fetchers
///
/// Implementations return the decoded document or a [`FetchError`];
/// they never retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch the document behind `request.url`
    async fn fetch(
        &self,
        request: &ExtractionRequest,
        options: &FetchOptions,
    ) -> Result<RawDocument, FetchError>;
}
