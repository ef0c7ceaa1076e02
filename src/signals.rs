//! Contact-signal and framework detection over raw HTML.
//!
//! Everything here is a pure, total function: malformed markup only means
//! fewer matches.

use crate::models::{Framework, FrameworkInfo, Signals};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Contact vocabulary (English and Spanish), matched case-insensitively.
pub const KEYWORDS: &[&str] = &[
    "email",
    "correo",
    "contacto",
    "phone",
    "telefono",
    "teléfono",
    "whatsapp",
    "wa.me",
    "tel:",
    "mailto:",
];

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.(?:com|mx|org|net|edu|info|biz|co|io)")
        .expect("email regex is valid")
});

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s\-()]{6,}\d").expect("phone regex is valid"));

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("non-digit regex is valid"));

static REACT_ROOT_DIV: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div[^>]+id=["']root["']"#).expect("react root regex is valid"));

static CONTENT_TAGS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body p, body h1, body h2, body h3, body li").expect("content selector is valid"));

/// Strip everything but digits.
pub fn clean_number(text: &str) -> String {
    NON_DIGIT.replace_all(text, "").into_owned()
}

/// Whether a phone candidate looks like a real number.
///
/// The digit-only form must have 8 to 12 digits, must not repeat a single
/// digit, and must not be an 11 or 12 digit run starting with `16` or `17`.
pub fn is_valid_phone(number: &str) -> bool {
    let clean = clean_number(number);
    let len = clean.chars().count();
    if !(8..=12).contains(&len) {
        return false;
    }
    if len >= 11 && (clean.starts_with("16") || clean.starts_with("17")) {
        return false;
    }
    let distinct: HashSet<char> = clean.chars().collect();
    distinct.len() > 1
}

/// Scan raw HTML for contact keywords, emails and phone numbers.
///
/// Works on the unparsed markup, so addresses and numbers inside attributes
/// and scripts count too.
///
/// # Arguments
///
/// * `html` - The raw document, any encoding errors already replaced
///
/// # Returns
///
/// A [`Signals`] with keywords in vocabulary order, emails as written and
/// phones reduced to digits. Never fails; garbage input yields empty sets.
///
/// # Examples
///
/// ```
/// use contact_scraper::detect_signals;
///
/// let signals = detect_signals("<p>Contacto: ventas@tienda.mx, tel. 449 805 5337</p>");
/// assert!(signals.has_email);
/// assert!(signals.phones_found.contains("4498055337"));
/// ```
pub fn detect_signals(html: &str) -> Signals {
    let lower_html = html.to_lowercase();
    let keywords_found: Vec<String> = KEYWORDS
        .iter()
        .filter(|k| lower_html.contains(*k))
        .map(|k| k.to_string())
        .collect();

    let emails_found: BTreeSet<String> = EMAIL_REGEX
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect();

    let phones_found: BTreeSet<String> = PHONE_REGEX
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|candidate| is_valid_phone(candidate))
        .map(clean_number)
        .collect();

    debug!(
        keywords = keywords_found.len(),
        emails = emails_found.len(),
        phones = phones_found.len(),
        "Detected signals"
    );

    Signals {
        has_email: !emails_found.is_empty(),
        has_phone: !phones_found.is_empty(),
        keywords_found,
        emails_found,
        phones_found,
    }
}

fn contains_any(haystack: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| haystack.contains(t))
}

fn fingerprint_matches(framework: Framework, lower_html: &str) -> bool {
    match framework {
        Framework::React => {
            contains_any(lower_html, &["data-reactroot", "reactroot", "__react", "react-dom"])
                || REACT_ROOT_DIV.is_match(lower_html)
        }
        Framework::Vue => contains_any(lower_html, &["id=\"app\"", "data-v-", "vue.js", "vue.runtime"]),
        // bare "ng-" also fires on class names such as "loading-spinner"
        Framework::Angular => contains_any(lower_html, &["ng-app", "ng-version", "angular.js", "ng-"]),
        Framework::Nextjs => contains_any(lower_html, &["__next", "/_next/", "next.config"]),
    }
}

/// Count headings, paragraphs and list items inside the document body.
///
/// Markup without a `<body>` tag counts zero; the parser would otherwise
/// synthesize one around bare fragments.
fn count_content_tags(html: &str, lower_html: &str) -> usize {
    if !lower_html.contains("<body") {
        return 0;
    }
    let document = Html::parse_document(html);
    document.select(&CONTENT_TAGS).count()
}

/// Fingerprint client-side frameworks and classify the page.
pub fn detect_framework(html: &str) -> FrameworkInfo {
    let lower_html = html.to_lowercase();
    let frameworks_detected: Vec<Framework> = Framework::ALL
        .into_iter()
        .filter(|f| fingerprint_matches(*f, &lower_html))
        .collect();

    let meaningful_tags = count_content_tags(html, &lower_html);
    let is_spa_like = !frameworks_detected.is_empty();
    debug!(
        frameworks = ?frameworks_detected,
        meaningful_tags,
        "Detected frameworks"
    );

    FrameworkInfo {
        frameworks_detected,
        is_spa_like,
        is_html_traditional: !is_spa_like && meaningful_tags > 5,
    }
}
