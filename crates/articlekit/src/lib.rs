//! ArticleKit - news article extraction library
//!
//! Fetches a web page and turns it into structured article data: title,
//! description, keywords, canonical link, domain, tags, links, embedded
//! videos, cleaned body text, a top image and a separately resolved
//! "main image".
//!
//! ## Pipeline
//!
//! 1. A [`Fetcher`] retrieves and decodes the HTML ([`DefaultFetcher`] by default)
//! 2. A [`DocumentAnalyzer`] derives the article fields ([`ArticleAnalyzer`] by default)
//! 3. [`resolve_main_image`] walks a fixed priority chain over the same HTML
//! 4. [`compose`] merges both into an [`Extraction`]
//!
//! Steps 2 and 3 run in parallel on the blocking pool.
//!
//! ```no_run
//! # async fn run() -> Result<(), articlekit::ExtractError> {
//! let extractor = articlekit::Extractor::default();
//! let extraction = extractor
//!     .extract(articlekit::ExtractionRequest::new("https://example.com/news/1"))
//!     .await?;
//! println!("{}", serde_json::to_string(&extraction).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod client;
mod compose;
mod encoding;
mod error;
mod extractor;
pub mod fetchers;
mod main_image;
mod types;

pub use analyzer::{AnalyzerConfig, ArticleAnalyzer, DocumentAnalyzer, ParserBackend};
pub use client::{extract, extract_html, extract_with_options, FetchOptions};
pub use compose::{compose, ANALYSIS_ERROR_PREFIX};
pub use encoding::decode_body;
pub use error::{AnalysisError, ExtractError, FetchError};
pub use extractor::{Extractor, ExtractorBuilder};
pub use fetchers::{DefaultFetcher, Fetcher};
pub use main_image::{resolve_main_image, try_resolve_main_image, ImageResolveError};
pub use types::{
    ArticleFields, ErrorResult, Extraction, ExtractionRequest, ExtractionResult, RawDocument,
    TopImage,
};

/// Default User-Agent sent to target sites
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
