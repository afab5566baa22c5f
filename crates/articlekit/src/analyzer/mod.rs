//! Document analysis: raw HTML in, structured article fields out
//!
//! [`ArticleAnalyzer`] is a heuristic analyzer in the spirit of the
//! readability family:
//! - metadata from `<title>`, `<meta>` and `<link>` tags
//! - main content located by paragraph scoring
//! - body text, links and embedded videos taken from that content node
//! - top image from OpenGraph, `image_src` or the first large image

mod content;
mod image;
mod metadata;

use crate::error::AnalysisError;
use crate::types::{ArticleFields, RawDocument};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// User agent the analyzer identifies with by default
pub const DEFAULT_ANALYZER_USER_AGENT: &str = "Mozilla";

/// Trait for document analyzers
///
/// Implementations must not panic on malformed markup; failures are
/// reported as [`AnalysisError`].
pub trait DocumentAnalyzer: Send + Sync {
    /// Unique identifier for this analyzer (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Derive article fields from a fetched document
    fn analyze(&self, document: &RawDocument) -> Result<ArticleFields, AnalysisError>;
}

/// How markup is parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParserBackend {
    /// html5ever error recovery, parse errors ignored
    #[default]
    Lenient,
    /// Documents with tree-builder errors are rejected; a missing
    /// DOCTYPE on its own is tolerated
    Strict,
}

/// Analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Identifying user agent
    pub user_agent: String,
    /// Parser behaviour
    pub parser: ParserBackend,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_ANALYZER_USER_AGENT.to_string(),
            parser: ParserBackend::default(),
        }
    }
}

/// Default heuristic analyzer
#[derive(Debug, Clone, Default)]
pub struct ArticleAnalyzer {
    config: AnalyzerConfig,
}

impl ArticleAnalyzer {
    /// Create a new analyzer
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyzer configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn parse(&self, html: &str) -> Result<Html, AnalysisError> {
        if html.trim().is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        if self.config.parser == ParserBackend::Lenient {
            return Ok(Html::parse_document(html));
        }

        // html5ever reports a missing DOCTYPE as an error, so supply one.
        let document = if has_doctype(html) {
            Html::parse_document(html)
        } else {
            Html::parse_document(&format!("<!DOCTYPE html>{html}"))
        };
        if let Some(err) = document.errors.first() {
            return Err(AnalysisError::Malformed(err.to_string()));
        }
        Ok(document)
    }
}

impl DocumentAnalyzer for ArticleAnalyzer {
    fn name(&self) -> &'static str {
        "article"
    }

    fn analyze(&self, raw: &RawDocument) -> Result<ArticleFields, AnalysisError> {
        debug!(
            url = raw.url(),
            user_agent = %self.config.user_agent,
            parser = ?self.config.parser,
            "Analyzing document"
        );
        let document = self.parse(raw.html())?;

        let page_url = Url::parse(raw.url()).ok();
        let canonical_link = metadata::canonical_link(&document, raw.url(), page_url.as_ref());
        let base_url = Url::parse(&canonical_link).ok().or(page_url);
        let domain = base_url.as_ref().map(metadata::domain).unwrap_or_default();

        let top_node = content::top_node(&document);
        let (article_text, links, videos) = match top_node {
            Some(node) => (
                content::article_text(node),
                content::links(node),
                content::videos(node),
            ),
            None => Default::default(),
        };

        let tags = metadata::tags(&document);
        let top_image = image::top_image(&document, top_node, base_url.as_ref());

        debug!(
            url = raw.url(),
            text_len = article_text.len(),
            links = links.len(),
            videos = videos.len(),
            "Document analyzed"
        );

        Ok(ArticleFields {
            title: metadata::title(&document),
            meta_description: metadata::description(&document),
            meta_keywords: metadata::keywords(&document),
            canonical_link,
            domain,
            entities: tags.clone(),
            tags,
            links,
            videos,
            article_text,
            top_image,
        })
    }
}

/// Whether a DOCTYPE appears near the start of the markup
fn has_doctype(html: &str) -> bool {
    html.as_bytes()
        .windows(DOCTYPE.len())
        .take(1024)
        .any(|w| w.eq_ignore_ascii_case(DOCTYPE))
}

const DOCTYPE: &[u8] = b"<!doctype";

/// First element matching a CSS selector
pub(crate) fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    root.select(&selector).next()
}

/// All elements matching a CSS selector, in document order
pub(crate) fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Trimmed text of an element with whitespace runs collapsed
pub(crate) fn collapsed_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
