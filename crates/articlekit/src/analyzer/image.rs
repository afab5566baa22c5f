//! Top image candidate for the article

use scraper::{ElementRef, Html};
use url::Url;

use super::metadata::{meta_content, resolve};
use super::{select_all, select_first};
use crate::types::TopImage;

/// Smallest declared side for an inline image to count as "big"
const MIN_IMAGE_SIDE: u32 = 50;

/// Pick the top image: OpenGraph, then `link[rel=image_src]`, then the
/// first big `<img>` inside the content node
pub(super) fn top_image(
    document: &Html,
    top: Option<ElementRef<'_>>,
    base: Option<&Url>,
) -> TopImage {
    if let Some(src) = meta_content(document, "og:image") {
        let dimension = |key: &str| meta_content(document, key).and_then(|v| parse_dimension(&v));
        return TopImage {
            image_src: resolve(base, &src),
            image_width: dimension("og:image:width"),
            image_height: dimension("og:image:height"),
            image_extraction_type: "opengraph".to_string(),
            image_bytes: None,
        };
    }

    if let Some(href) = select_first(document.root_element(), "link[rel='image_src']")
        .and_then(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
    {
        return TopImage {
            image_src: resolve(base, href),
            image_extraction_type: "linktag".to_string(),
            ..Default::default()
        };
    }

    top.and_then(|node| big_image(node, base)).unwrap_or_default()
}

fn big_image(top: ElementRef<'_>, base: Option<&Url>) -> Option<TopImage> {
    select_all(top, "img[src]").into_iter().find_map(|img| {
        let src = img.value().attr("src")?.trim();
        if src.is_empty() || src.starts_with("data:") {
            return None;
        }
        let width = img.value().attr("width").and_then(parse_dimension);
        let height = img.value().attr("height").and_then(parse_dimension);
        let too_small = [width, height]
            .iter()
            .flatten()
            .any(|side| *side < MIN_IMAGE_SIDE);
        if too_small {
            return None;
        }
        Some(TopImage {
            image_src: resolve(base, src),
            image_width: width,
            image_height: height,
            image_extraction_type: "bigimage".to_string(),
            image_bytes: None,
        })
    })
}

/// Pixel count from an attribute like `"640"` or `"640px"`
fn parse_dimension(value: &str) -> Option<u32> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(html: &str) -> TopImage {
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com/news/story").unwrap();
        let top = select_first(document.root_element(), "#content");
        top_image(&document, top, Some(&base))
    }

    #[test]
    fn test_opengraph_image() {
        let image = pick(r#"
            <meta property="og:image" content="https://cdn.example.com/a.jpg">
            <meta property="og:image:width" content="800">
            <link rel="image_src" href="/b.jpg">
        "#);
        assert_eq!(image.image_src, "https://cdn.example.com/a.jpg");
        assert_eq!(image.image_extraction_type, "opengraph");
        assert_eq!(image.image_width, Some(800));
        assert_eq!(image.image_height, None);
    }

    #[test]
    fn test_link_tag_image() {
        let image = pick(r#"<link rel="image_src" href="/b.jpg">"#);
        assert_eq!(image.image_src, "https://example.com/b.jpg");
        assert_eq!(image.image_extraction_type, "linktag");
    }

    #[test]
    fn test_big_image_in_content() {
        let image = pick(r#"
            <body><div id="content">
                <img src="/pixel.gif" width="1" height="1">
                <img src="data:image/png;base64,AAAA">
                <img src="photo.jpg" width="640px" height="480">
            </div></body>
        "#);
        assert_eq!(image.image_src, "https://example.com/news/photo.jpg");
        assert_eq!(image.image_extraction_type, "bigimage");
        assert_eq!(image.image_width, Some(640));
        assert_eq!(image.image_height, Some(480));
    }

    #[test]
    fn test_no_image() {
        let image = pick(r#"<body><div id="content"><p>text</p></div></body>"#);
        assert_eq!(image, TopImage::default());
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("300"), Some(300));
        assert_eq!(parse_dimension(" 300px "), Some(300));
        assert_eq!(parse_dimension("auto"), None);
        assert_eq!(parse_dimension("50%"), None);
    }
}
