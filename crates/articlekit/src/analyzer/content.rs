//! Main content detection and body text extraction

use scraper::{ElementRef, Html, Node};
use std::collections::{HashMap, HashSet};
use url::Url;

use super::{collapse_whitespace, collapsed_text, select_all, select_first};

/// Elements whose text can score their container
const SCORED_TAGS: &str = "p, pre, td";

/// Minimum characters for a paragraph to count
const MIN_PARAGRAPH_LEN: usize = 25;

/// Blocks with more linked text than this are navigation, not prose
const MAX_LINK_DENSITY: f64 = 0.5;

/// Containers tried in order when no paragraph scored
const FALLBACK_CONTAINERS: &[&str] = &[
    "article",
    "[itemprop='articleBody']",
    "main",
    "[role='main']",
    "body",
];

/// Text blocks emitted as one paragraph each
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre",
];

/// Subtrees that never contribute text
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "aside", "footer", "form", "figcaption",
    "iframe", "svg", "button", "select",
];

/// Ancestors that disqualify a paragraph from scoring
const BOILERPLATE_TAGS: &[&str] = &["nav", "aside", "footer", "form", "header"];

/// Video providers recognised in embed URLs: host and required path prefix
const VIDEO_PROVIDERS: &[(&str, &str)] = &[
    ("youtube.com", "/"),
    ("youtube-nocookie.com", "/"),
    ("youtu.be", "/"),
    ("vimeo.com", "/"),
    ("dailymotion.com", "/"),
    ("kewego.com", "/"),
    ("twitch.tv", "/"),
    ("facebook.com", "/plugins/video"),
];

/// Find the element holding the article body
pub(super) fn top_node(document: &Html) -> Option<ElementRef<'_>> {
    let root = document.root_element();
    // Insertion order doubles as the tie-breaker: earlier containers win.
    let mut order = Vec::new();
    let mut scores: HashMap<_, f64> = HashMap::new();

    let mut add = |node: ElementRef<'_>, score: f64| {
        let id = node.id();
        if !scores.contains_key(&id) {
            order.push(id);
        }
        *scores.entry(id).or_insert(0.0) += score;
    };

    for paragraph in select_all(root, SCORED_TAGS) {
        if has_ancestor_in(paragraph, BOILERPLATE_TAGS) {
            continue;
        }
        let text = collapsed_text(paragraph);
        let len = text.chars().count();
        let linked = linked_text_len(paragraph);
        if len.saturating_sub(linked) < MIN_PARAGRAPH_LEN {
            continue;
        }
        let density = link_density(paragraph);
        if density > MAX_LINK_DENSITY {
            continue;
        }

        let commas = text.matches(',').count() as f64;
        let length_bonus = (len as f64 / 100.0).min(3.0);
        let score = (1.0 + commas + length_bonus) * (1.0 - density);

        if let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) {
            add(parent, score);
            if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
                add(grandparent, score / 2.0);
            }
        }
    }

    let mut best = None;
    let mut best_score = 0.0;
    for id in order {
        let score = scores.get(&id).copied().unwrap_or_default();
        if best.is_none() || score > best_score {
            best = Some(id);
            best_score = score;
        }
    }

    best.and_then(|id| document.tree.get(id))
        .and_then(ElementRef::wrap)
        .or_else(|| {
            FALLBACK_CONTAINERS
                .iter()
                .find_map(|css| select_first(root, css))
        })
}

/// Cleaned body text: one paragraph per block, separated by blank lines
pub(super) fn article_text(top: ElementRef<'_>) -> String {
    let mut blocks = Vec::new();
    // Explicit stack keeps deeply nested markup off the call stack.
    let mut stack: Vec<ElementRef<'_>> = vec![top];

    while let Some(element) = stack.pop() {
        if element.id() != top.id() && BLOCK_TAGS.contains(&element.value().name()) {
            let text = visible_text(element);
            if !text.is_empty() && link_density(element) <= MAX_LINK_DENSITY {
                blocks.push(text);
            }
            continue;
        }

        let children: Vec<ElementRef<'_>> = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| !SKIP_TAGS.contains(&child.value().name()))
            .collect();
        stack.extend(children.into_iter().rev());
    }

    if blocks.is_empty() {
        return visible_text(top);
    }
    blocks.join("\n\n")
}

/// Link targets inside the content node, in document order
pub(super) fn links(top: ElementRef<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    select_all(top, "a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| {
            !href.is_empty()
                && !href.starts_with('#')
                && !href.to_ascii_lowercase().starts_with("javascript:")
        })
        .filter(|href| seen.insert(href.to_string()))
        .map(|href| href.to_string())
        .collect()
}

/// Embedded video URLs inside the content node, in document order
pub(super) fn videos(top: ElementRef<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    select_all(top, "iframe[src], embed[src], object[data]")
        .into_iter()
        .filter_map(|el| el.value().attr("src").or_else(|| el.value().attr("data")))
        .map(str::trim)
        .filter(|src| is_video_url(src))
        .filter(|src| seen.insert(src.to_string()))
        .map(|src| src.to_string())
        .collect()
}

fn is_video_url(src: &str) -> bool {
    let parsed = match src.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{rest}")),
        None => Url::parse(src),
    };
    let Ok(url) = parsed else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    VIDEO_PROVIDERS.iter().any(|(provider, path)| {
        let on_host = host == *provider
            || host
                .strip_suffix(provider)
                .is_some_and(|sub| sub.ends_with('.'));
        on_host && url.path().starts_with(path)
    })
}

/// Share of an element's text that sits inside links
fn link_density(element: ElementRef<'_>) -> f64 {
    let total = element.text().map(|t| t.trim().chars().count()).sum::<usize>();
    if total == 0 {
        return 0.0;
    }
    linked_text_len(element) as f64 / total as f64
}

/// Characters of text inside the element's links
fn linked_text_len(element: ElementRef<'_>) -> usize {
    select_all(element, "a")
        .into_iter()
        .flat_map(|a| a.text())
        .map(|t| t.trim().chars().count())
        .sum()
}

fn has_ancestor_in(element: ElementRef<'_>, tags: &[&str]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| tags.contains(&a.value().name()))
}

/// Text of an element, skipping script-like and navigation subtrees
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => {
                let hidden = node
                    .ancestors()
                    .take_while(|a| a.id() != element.id())
                    .filter_map(ElementRef::wrap)
                    .any(|a| SKIP_TAGS.contains(&a.value().name()));
                if !hidden {
                    text.push_str(t);
                }
            }
            Node::Element(e) if e.name() == "br" => text.push(' '),
            _ => {}
        }
    }
    collapse_whitespace(&text)
}
