// src/checker/html.rs
// =============================================================================
// This module pulls everything the crawler needs out of an HTML page:
// - the <title>
// - the visible body text (for spotting "Page not found" style pages)
// - every link on the page, resolved to an absolute URL
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to resolve relative links against the page URL,
// the same way a browser fills in `a.href`.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

/// The parts of a page the crawler looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub title: String,
    pub body_text: String,
    pub links: Vec<String>,
}

// Elements whose text never shows up on screen
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

// Parses an HTML document into title, visible text and links
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL the page was served from (for resolving relative links)
pub fn extract_page(html: &str, page_url: &Url) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        title: extract_title(&document),
        body_text: extract_body_text(&document),
        links: extract_links(&document, page_url),
    }
}

fn extract_title(document: &Html) -> String {
    // These selectors are constants and known to be valid, so unwrap() is fine
    let selector = Selector::parse("title").unwrap();

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

// Collects the text nodes under <body>, skipping scripts and styles,
// roughly what `document.body.innerText` gives you in a browser
fn extract_body_text(document: &Html) -> String {
    let selector = Selector::parse("body").unwrap();

    let Some(body) = document.select(&selector).next() else {
        return String::new();
    };

    let mut parts = Vec::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .map(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            .unwrap_or(false);

        let text = text.trim();
        if !hidden && !text.is_empty() {
            parts.push(text);
        }
    }

    parts.join(" ")
}

fn extract_links(document: &Html, base: &Url) -> Vec<String> {
    let selector = Selector::parse("a[href]").unwrap();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(base, href) {
                if is_checkable_link(&absolute_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://other.com" -> Some("https://other.com/")
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    // join() handles absolute hrefs too: they simply replace the base
    base.join(href.trim()).ok().map(|url| url.to_string())
}

// We only follow http(s) links.
// mailto:, tel:, javascript:, data: and file: links are dropped.
fn is_checkable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
