//! HTML to deduplicated text.
//!
//! [`extract_text`] turns a noisy page into one line per content-bearing
//! element (headings, paragraphs, list items and links):
//!
//! 1. bytes are decoded lossily
//! 2. `script`, `style`, `noscript` and comments contribute nothing
//! 3. Cloudflare-protected emails are decoded in place, protected links become
//!    `mailto:` links
//! 4. elements hidden with an inline `display: none` are dropped
//! 5. each `h1`-`h4`, `p`, `li` and `a` yields its visible text, links get
//!    their destination appended as `"<text>: <href>"`
//! 6. whitespace is normalized
//! 7. lines are deduplicated on [`dedup_key`], first occurrence wins
//!
//! The parsed tree is never mutated; removal and replacement are applied
//! while walking it.

use crate::obfuscation::{CFEMAIL_ATTR, EMAIL_PROTECTION_MARKER, decode_cloudflare_email};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};
use std::collections::HashSet;
use tracing::debug;

const NOISE_TAGS: &[&str] = &["script", "style", "noscript"];
const CONTENT_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "p", "li", "a"];
const MIN_LINE_CHARS: usize = 3;

static HIDDEN_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)display:\s*none").expect("hidden style regex is valid"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line regex is valid"));
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("space regex is valid"));
static LINK_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":\s*(?:https?://|/).*$").expect("link suffix regex is valid"));

/// Extract normalized, deduplicated text lines from an HTML document.
///
/// # Arguments
///
/// * `html` - `&str`, `String` or raw bytes; invalid UTF-8 is replaced
///   rather than rejected
///
/// # Returns
///
/// One line per content element, joined with `\n`. Never fails: malformed
/// markup only yields fewer lines.
///
/// # Examples
///
/// ```
/// use contact_scraper::extract_text;
///
/// let html = r#"<h1>Tacos</h1><script>x()</script><a href="/menu">Ver menú</a>"#;
/// assert_eq!(extract_text(html), "Tacos\nVer menú: /menu");
/// ```
pub fn extract_text(html: impl AsRef<[u8]>) -> String {
    let html = String::from_utf8_lossy(html.as_ref());
    let document = Html::parse_document(&html);

    let lines = content_lines(&document);
    let text = normalize_whitespace(&lines.join("\n"));
    let deduped = dedup_lines(&text);
    debug!(raw_lines = lines.len(), kept_lines = deduped.len(), "Extracted text");
    deduped.join("\n")
}

/// The key two lines must share to count as duplicates.
///
/// Lowercases the line after stripping a trailing `": <url-or-path>"`, so
/// `"Contact us: /a"` and `"Contact us: https://b.com"` collide.
pub fn dedup_key(line: &str) -> String {
    LINK_SUFFIX.replace(line, "").trim().to_lowercase()
}

/// Trim lines, drop empty ones and keep the first line seen per [`dedup_key`].
pub fn dedup_lines(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(dedup_key(line)))
        .map(str::to_string)
        .collect()
}

fn content_lines(document: &Html) -> Vec<String> {
    let mut lines = Vec::new();
    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if !CONTENT_TAGS.contains(&element.value().name()) || is_removed(element) {
            continue;
        }

        let mut fragments = Vec::new();
        collect_fragments(element, &mut fragments);
        let text = WHITESPACE_RUN.replace_all(&fragments.join(" "), " ").into_owned();
        if text.chars().count() < MIN_LINE_CHARS {
            continue;
        }

        let line = match link_target(element) {
            Some(href) if !text.contains(href.as_str()) => format!("{text}: {href}"),
            _ => text,
        };
        lines.push(line);
    }
    lines
}

fn is_noise(element: &Element) -> bool {
    NOISE_TAGS.contains(&element.name())
        || element.attr("style").is_some_and(|style| HIDDEN_STYLE.is_match(style))
}

/// True when the element or any ancestor is noise or hidden.
fn is_removed(element: ElementRef<'_>) -> bool {
    let node = *element;
    std::iter::once(node)
        .chain(node.ancestors())
        .filter_map(|node| node.value().as_element())
        .any(is_noise)
}

/// Visible text fragments of `element`, trimmed and without empties.
fn collect_fragments(element: ElementRef<'_>, out: &mut Vec<String>) {
    if let Some(email) = protected_email(element.value()) {
        out.push(email);
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            Node::Element(el) if is_noise(el) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_fragments(child, out);
                }
            }
            _ => {}
        }
    }
}

/// The decoded address replacing an element's text, if it carries one.
///
/// A protected link wins over a `data-cfemail` attribute on the same element.
fn protected_email(element: &Element) -> Option<String> {
    if element.name() == "a" {
        if let Some(email) = element.attr("href").and_then(decode_protected_href) {
            return Some(email);
        }
    }
    element
        .attr(CFEMAIL_ATTR)
        .map(decode_cloudflare_email)
        .filter(|email| !email.is_empty())
}

fn decode_protected_href(href: &str) -> Option<String> {
    if !href.contains(EMAIL_PROTECTION_MARKER) {
        return None;
    }
    let payload = href.rsplit('#').next().unwrap_or_default();
    Some(decode_cloudflare_email(payload)).filter(|email| !email.is_empty())
}

/// Destination to append for anchors, with protected links rewritten.
fn link_target(element: ElementRef<'_>) -> Option<String> {
    let el = element.value();
    if el.name() != "a" {
        return None;
    }
    let href = el.attr("href")?;
    Some(match decode_protected_href(href) {
        Some(email) => format!("mailto:{email}"),
        None => href.trim().to_string(),
    })
}

fn normalize_whitespace(text: &str) -> String {
    let text = text.replace('\u{a0}', " ");
    let text = BLANK_LINES.replace_all(&text, "\n");
    SPACE_RUN.replace_all(&text, " ").into_owned()
}
