//! Extractor builder and pipeline

use crate::analyzer::{AnalyzerConfig, ArticleAnalyzer, DocumentAnalyzer, ParserBackend};
use crate::client::FetchOptions;
use crate::compose::compose;
use crate::error::{AnalysisError, ExtractError};
use crate::fetchers::{DefaultFetcher, Fetcher};
use crate::main_image::resolve_main_image;
use crate::types::{ExtractionRequest, ExtractionResult, Extraction, RawDocument};
use schemars::schema_for;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builder for configuring an [`Extractor`]
#[derive(Default)]
pub struct ExtractorBuilder {
    /// User-Agent sent when fetching
    user_agent: Option<String>,
    /// Settings for the default analyzer
    analyzer_config: AnalyzerConfig,
    /// Replacement fetcher
    fetcher: Option<Arc<dyn Fetcher>>,
    /// Replacement analyzer
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
}

impl ExtractorBuilder {
    /// Create a new builder with default fetcher and analyzer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the User-Agent sent to target sites
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the user agent the default analyzer identifies with
    pub fn analyzer_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.analyzer_config.user_agent = ua.into();
        self
    }

    /// Select how the default analyzer parses markup
    pub fn parser(mut self, parser: ParserBackend) -> Self {
        self.analyzer_config.parser = parser;
        self
    }

    /// Use a custom fetcher
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Use a custom analyzer; overrides `parser` and `analyzer_user_agent`
    pub fn analyzer(mut self, analyzer: impl DocumentAnalyzer + 'static) -> Self {
        self.analyzer = Some(Arc::new(analyzer));
        self
    }

    /// Build the extractor
    pub fn build(self) -> Extractor {
        Extractor {
            fetcher: self
                .fetcher
                .unwrap_or_else(|| Arc::new(DefaultFetcher::new())),
            analyzer: self
                .analyzer
                .unwrap_or_else(|| Arc::new(ArticleAnalyzer::new(self.analyzer_config))),
            resolver: resolve_main_image,
            options: FetchOptions {
                user_agent: self.user_agent,
            },
        }
    }
}

/// Configured extraction pipeline
///
/// Immutable once built; clone it or wrap it in an `Arc` to share it
/// between requests.
#[derive(Clone)]
pub struct Extractor {
    fetcher: Arc<dyn Fetcher>,
    analyzer: Arc<dyn DocumentAnalyzer>,
    resolver: fn(&str) -> String,
    options: FetchOptions,
}

impl Default for Extractor {
    fn default() -> Self {
        ExtractorBuilder::new().build()
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("fetcher", &self.fetcher.name())
            .field("analyzer", &self.analyzer.name())
            .field("options", &self.options)
            .finish()
    }
}

impl Extractor {
    /// Create a new extractor builder
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// Options passed to the fetcher
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ExtractionRequest);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Get output schema as JSON
    pub fn output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ExtractionResult);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Fetch `req.url` and extract its article
    pub async fn extract(&self, req: ExtractionRequest) -> Result<Extraction, ExtractError> {
        if req.url.is_empty() {
            return Err(ExtractError::MissingUrl);
        }

        debug!(fetcher = self.fetcher.name(), url = %req.url, "Using fetcher");
        let document = self.fetcher.fetch(&req, &self.options).await?;
        self.extract_document(document).await
    }

    /// Run analyzer and main-image resolver over an already fetched document
    ///
    /// Both run on the blocking pool in parallel and are joined before the
    /// result is composed.
    pub async fn extract_document(&self, document: RawDocument) -> Result<Extraction, ExtractError> {
        let document = Arc::new(document);

        let analyzer = Arc::clone(&self.analyzer);
        let doc = Arc::clone(&document);
        let analysis = tokio::task::spawn_blocking(move || analyzer.analyze(&doc));

        let resolver = self.resolver;
        let doc = Arc::clone(&document);
        let main_image = tokio::task::spawn_blocking(move || resolver(doc.html()));

        let (analysis, main_image) = tokio::join!(analysis, main_image);

        let analysis = analysis.unwrap_or_else(|e| Err(AnalysisError::Aborted(e.to_string())));
        let main_image = main_image.unwrap_or_else(|e| {
            warn!("Main image task failed: {}", e);
            String::new()
        });

        if let Err(ref e) = analysis {
            debug!(url = document.url(), error = %e, "Analysis failed");
        }
        Ok(compose(analysis, main_image))
    }
}
