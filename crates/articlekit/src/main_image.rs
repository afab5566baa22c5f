//! Main-image resolution
//!
//! Picks the page's primary image from, in order of trust: social-sharing
//! meta tags, the first `<article>`, the first `<figure>`, then the first
//! `<img>` anywhere. The first non-empty value wins.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::warn;

/// Internal resolver failure, never surfaced to callers
#[derive(Debug, Error)]
pub enum ImageResolveError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector {
        selector: &'static str,
        reason: String,
    },
}

/// One step of the fallback chain
enum Source {
    /// `content` of the first element matching the selector
    Meta(&'static str),
    /// `src` of the first `<img>` under the first element matching the selector
    Container(&'static str),
    /// `src` of the first `<img>` in the document
    FirstImage,
}

const CHAIN: &[Source] = &[
    Source::Meta(r#"meta[property="og:image"]"#),
    Source::Meta(r#"meta[name="twitter:image"]"#),
    Source::Container("article"),
    Source::Container("figure"),
    Source::FirstImage,
];

/// Resolve the main image URL of a page, or `""` when there is none
///
/// Values are returned exactly as written in the markup.
pub fn resolve_main_image(html: &str) -> String {
    match try_resolve_main_image(html) {
        Ok(found) => found.unwrap_or_default(),
        Err(e) => {
            warn!("Error extracting main image: {}", e);
            String::new()
        }
    }
}

/// Fallible form of [`resolve_main_image`]
pub fn try_resolve_main_image(html: &str) -> Result<Option<String>, ImageResolveError> {
    let document = Html::parse_document(html);
    let img = selector("img")?;

    for source in CHAIN {
        let found = match *source {
            Source::Meta(sel) => first(&document, &selector(sel)?)
                .and_then(|meta| non_empty_attr(meta, "content")),
            Source::Container(sel) => first(&document, &selector(sel)?)
                .and_then(|container| container.select(&img).next())
                .and_then(|image| non_empty_attr(image, "src")),
            Source::FirstImage => {
                first(&document, &img).and_then(|image| non_empty_attr(image, "src"))
            }
        };
        if found.is_some() {
            return Ok(found);
        }
    }

    Ok(None)
}

fn selector(sel: &'static str) -> Result<Selector, ImageResolveError> {
    Selector::parse(sel).map_err(|e| ImageResolveError::Selector {
        selector: sel,
        reason: e.to_string(),
    })
}

fn first<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

/// Attribute value, treating an empty value like a missing one
fn non_empty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}
