//! Metadata extraction: title, description, keywords, canonical link, tags

use scraper::Html;
use std::collections::BTreeSet;
use url::Url;

use super::{collapse_whitespace, collapsed_text, select_all, select_first};

/// Separators between an article title and the site name
const TITLE_DELIMITERS: &[&str] = &[" | ", " - ", " – ", " — ", " » ", " :: "];

/// Anchors whose href marks them as tag links
const TAG_HREF_SELECTOR: &str =
    "a[href*='/tag/'], a[href*='/tags/'], a[href*='/topic/'], a[href*='?keyword=']";

/// `content` of the first `<meta>` whose `name` or `property` is `key`
pub(super) fn meta_content(document: &Html, key: &str) -> Option<String> {
    let root = document.root_element();
    [
        format!("meta[property='{key}']"),
        format!("meta[name='{key}']"),
    ]
    .iter()
    .filter_map(|css| select_first(root, css))
    .filter_map(|meta| meta.value().attr("content"))
    .map(collapse_whitespace)
    .find(|content| !content.is_empty())
}

/// Article title
///
/// `og:title`, then `<meta name="headline">`, then `<title>`, then the
/// first `<h1>`, with the site name stripped.
pub(super) fn title(document: &Html) -> String {
    let raw = meta_content(document, "og:title")
        .or_else(|| meta_content(document, "headline"))
        .or_else(|| {
            ["title", "h1"]
                .iter()
                .filter_map(|css| select_first(document.root_element(), css))
                .map(collapsed_text)
                .find(|text| !text.is_empty())
        })
        .unwrap_or_default();

    clean_title(&raw, meta_content(document, "og:site_name").as_deref())
}

/// Strip the site name from a title
///
/// Removes an explicit site name first, then splits on the usual
/// delimiters and keeps the longest piece.
pub(super) fn clean_title(title: &str, site_name: Option<&str>) -> String {
    let mut title = title.trim().to_string();

    if let Some(site) = site_name.filter(|s| !s.is_empty() && *s != title) {
        for delimiter in TITLE_DELIMITERS {
            let suffix = format!("{delimiter}{site}");
            let prefix = format!("{site}{delimiter}");
            if let Some(stripped) = title.strip_suffix(&suffix) {
                title = stripped.to_string();
                break;
            }
            if let Some(stripped) = title.strip_prefix(&prefix) {
                title = stripped.to_string();
                break;
            }
        }
    }

    for delimiter in TITLE_DELIMITERS {
        if title.contains(delimiter) {
            let longest = title
                .split(delimiter)
                .map(str::trim)
                .fold("", |best, piece| {
                    if piece.chars().count() > best.chars().count() {
                        piece
                    } else {
                        best
                    }
                });
            return longest.to_string();
        }
    }

    title
}

/// `<meta name="description">`, then `og:description`
pub(super) fn description(document: &Html) -> String {
    meta_content(document, "description")
        .or_else(|| meta_content(document, "og:description"))
        .unwrap_or_default()
}

/// Comma separated `<meta name="keywords">`, empties dropped
pub(super) fn keywords(document: &Html) -> Vec<String> {
    meta_content(document, "keywords")
        .map(|content| {
            content
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| k.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Canonical URL of the page
///
/// `<link rel="canonical">`, then `og:url`, then the page URL itself.
/// Relative values are resolved against the page URL.
pub(super) fn canonical_link(document: &Html, page_url: &str, base: Option<&Url>) -> String {
    let declared = select_first(document.root_element(), "link[rel='canonical']")
        .and_then(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| href.to_string())
        .or_else(|| meta_content(document, "og:url"));

    match declared {
        Some(href) => resolve(base, &href),
        None => page_url.to_string(),
    }
}

/// Host of a URL, with the port when it is not the scheme default
pub(super) fn domain(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

/// Tag names found on the page
///
/// `rel="tag"` anchors win; tag-looking hrefs are only consulted when
/// there are none. `article:tag` meta values are always added.
pub(super) fn tags(document: &Html) -> BTreeSet<String> {
    let root = document.root_element();
    let mut anchors = select_all(root, "a[rel~='tag']");
    if anchors.is_empty() {
        anchors = select_all(root, TAG_HREF_SELECTOR);
    }

    let meta_tags = select_all(root, "meta[property='article:tag']")
        .into_iter()
        .filter_map(|meta| meta.value().attr("content"))
        .map(collapse_whitespace);

    anchors
        .into_iter()
        .map(collapsed_text)
        .chain(meta_tags)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Resolve `href` against `base`, falling back to the raw value
pub(super) fn resolve(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_title_prefers_og_title() {
        let html = doc(r#"
            <head>
                <meta property="og:title" content="OG Title">
                <title>Tag Title</title>
            </head>
        "#);
        assert_eq!(title(&html), "OG Title");
    }

    #[test]
    fn test_title_from_title_tag_then_h1() {
        assert_eq!(title(&doc("<title> Plain   Title </title>")), "Plain Title");
        assert_eq!(
            title(&doc("<body><h1>Heading Title</h1></body>")),
            "Heading Title"
        );
        assert_eq!(title(&doc("<body><p>No title</p></body>")), "");
    }

    #[test]
    fn test_clean_title_keeps_longest_piece() {
        assert_eq!(
            clean_title("Markets rally after rate cut - Example News", None),
            "Markets rally after rate cut"
        );
        assert_eq!(
            clean_title("Site | A much longer headline here", None),
            "A much longer headline here"
        );
        assert_eq!(clean_title("No delimiter here", None), "No delimiter here");
    }

    #[test]
    fn test_clean_title_strips_site_name() {
        assert_eq!(
            clean_title("Short » Example Daily Gazette", Some("Example Daily Gazette")),
            "Short"
        );
    }

    #[test]
    fn test_description_fallback() {
        let html = doc(r#"<meta property="og:description" content="From OG">"#);
        assert_eq!(description(&html), "From OG");

        let html = doc(r#"
            <meta name="description" content="From meta">
            <meta property="og:description" content="From OG">
        "#);
        assert_eq!(description(&html), "From meta");
    }

    #[test]
    fn test_keywords() {
        let html = doc(r#"<meta name="keywords" content="a, b ,, c ">"#);
        assert_eq!(keywords(&html), vec!["a", "b", "c"]);
        assert!(keywords(&doc("<p>none</p>")).is_empty());
    }

    #[test]
    fn test_canonical_link() {
        let base = Url::parse("https://example.com/news/story").unwrap();

        let html = doc(r#"<link rel="canonical" href="/news/canonical-story">"#);
        assert_eq!(
            canonical_link(&html, base.as_str(), Some(&base)),
            "https://example.com/news/canonical-story"
        );

        let html = doc(r#"<meta property="og:url" content="https://example.com/og">"#);
        assert_eq!(
            canonical_link(&html, base.as_str(), Some(&base)),
            "https://example.com/og"
        );

        let html = doc("<p>nothing</p>");
        assert_eq!(
            canonical_link(&html, base.as_str(), Some(&base)),
            "https://example.com/news/story"
        );
    }

    #[test]
    fn test_domain() {
        assert_eq!(
            domain(&Url::parse("https://www.example.com/a").unwrap()),
            "www.example.com"
        );
        assert_eq!(
            domain(&Url::parse("http://127.0.0.1:8080/a").unwrap()),
            "127.0.0.1:8080"
        );
    }

    #[test]
    fn test_rel_tag_anchors_win() {
        let html = doc(r#"
            <a rel="tag" href="/t/rust">Rust</a>
            <a rel="tag" href="/t/async">Async</a>
            <a href="/tag/ignored">Ignored</a>
        "#);
        let found = tags(&html);
        assert_eq!(found.len(), 2);
        assert!(found.contains("Rust"));
        assert!(found.contains("Async"));
    }

    #[test]
    fn test_tag_href_fallback_and_meta_tags() {
        let html = doc(r#"
            <head><meta property="article:tag" content="Economy"></head>
            <body>
                <a href="https://example.com/tag/markets">Markets</a>
                <a href="/topic/energy"> Energy </a>
                <a href="/tag/markets">Markets</a>
                <a href="/about">About</a>
            </body>
        "#);
        let found: Vec<_> = tags(&html).into_iter().collect();
        assert_eq!(found, vec!["Economy", "Energy", "Markets"]);
    }
}
