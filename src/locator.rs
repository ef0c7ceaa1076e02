//! Find a target string inside raw HTML with surrounding context.
//!
//! Numeric targets match digit by digit with any non-digit run in between, so
//! `"449 805 5337"` finds `449-805-5337`, `(449) 805 5337` or
//! `449<span>805</span>5337`.

use crate::models::{HitSource, LocatorHit};
use crate::signals::clean_number;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Default number of context characters on each side of a hit.
pub const DEFAULT_CONTEXT_CHARS: usize = 50;

/// All non-overlapping occurrences of `target` in `html`, leftmost first.
///
/// # Arguments
///
/// * `target` - A phone number (digits matched with any separators between
///   them) or a phrase (matched literally, ignoring case)
/// * `html` - The document to search
/// * `context_chars` - Characters of context kept on each side of a match
///
/// # Returns
///
/// One [`LocatorHit`] per match, with byte offsets into `html`. Nothing for
/// an empty target or document, and nothing when the search pattern cannot
/// be built.
///
/// # Examples
///
/// ```
/// use contact_scraper::find_occurrences;
///
/// let hits = find_occurrences("4498055337", "Llámanos (449) 805-5337 hoy", 5);
/// assert_eq!(hits[0].match_text, "449) 805-5337");
/// assert_eq!(hits[0].snippet, "nos (449) 805-5337 hoy");
/// ```
pub fn find_occurrences(target: &str, html: &str, context_chars: usize) -> Vec<LocatorHit> {
    if target.is_empty() || html.is_empty() {
        return Vec::new();
    }

    let pattern = match build_pattern(target) {
        Ok(pattern) => pattern,
        Err(e) => {
            debug!(error = %e, target, "Could not build locator pattern");
            return Vec::new();
        }
    };

    pattern
        .find_iter(html)
        .map(|m| {
            let (from, to) = snippet_bounds(html, m.start(), m.end(), context_chars);
            LocatorHit {
                source: HitSource::Raw,
                match_text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                snippet: html[from..to].to_string(),
            }
        })
        .collect()
}

fn build_pattern(target: &str) -> Result<Regex, regex::Error> {
    let digits = clean_number(target);
    let source = if digits.is_empty() {
        regex::escape(target)
    } else {
        digits
            .chars()
            .map(|d| regex::escape(&d.to_string()))
            .collect::<Vec<_>>()
            .join(r"\D*")
    };
    RegexBuilder::new(&source).case_insensitive(true).build()
}

/// Byte range covering `context` characters either side of `start..end`.
fn snippet_bounds(text: &str, start: usize, end: usize, context: usize) -> (usize, usize) {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(context)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(context)
        .map_or(text.len(), |(i, _)| end + i);
    (from, to)
}
