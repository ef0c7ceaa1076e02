//! Data records produced by the scraper core.
//!
//! - [`FetchResult`]: one successfully fetched and analyzed page
//! - [`Signals`]: contact signals found in a page's raw HTML
//! - [`FrameworkInfo`]: client-side framework fingerprints for a page
//! - [`LocatorHit`]: one occurrence of a searched string inside a document
//!
//! All records are plain data. They serialize with snake_case field names so
//! callers can dump them straight to JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A page that was fetched, decoded and analyzed.
///
/// Only successful fetches produce a `FetchResult`; failed URLs are simply
/// absent from a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    /// The URL as it was requested.
    pub url: String,
    /// Length of the raw response body in bytes.
    pub size_bytes: usize,
    /// Contact signals detected in the raw HTML.
    pub signals: Signals,
    /// Framework fingerprints detected in the raw HTML.
    pub framework: FrameworkInfo,
    /// The decoded HTML, unless the fetch policy discards bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Contact signals found in a single HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals {
    /// Matched vocabulary terms, in vocabulary order.
    pub keywords_found: Vec<String>,
    /// Email addresses exactly as they appear in the document.
    pub emails_found: BTreeSet<String>,
    /// Phone numbers normalized to digits only.
    pub phones_found: BTreeSet<String>,
    pub has_email: bool,
    pub has_phone: bool,
}

/// Client-side frameworks recognized by markup fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    React,
    Vue,
    Angular,
    Nextjs,
}

impl Framework {
    /// Every framework, in reporting order.
    pub const ALL: [Framework; 4] = [
        Framework::React,
        Framework::Vue,
        Framework::Angular,
        Framework::Nextjs,
    ];

    /// Lowercase name, as used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Vue => "vue",
            Framework::Angular => "angular",
            Framework::Nextjs => "nextjs",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Framework fingerprint summary for one document.
///
/// `is_html_traditional` is only true when no framework was detected and the
/// body carries more than five headings, paragraphs or list items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkInfo {
    /// Detected frameworks in react, vue, angular, nextjs order.
    pub frameworks_detected: Vec<Framework>,
    pub is_spa_like: bool,
    pub is_html_traditional: bool,
}

impl FrameworkInfo {
    pub fn detected(&self, framework: Framework) -> bool {
        self.frameworks_detected.contains(&framework)
    }
}

/// Where a [`LocatorHit`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitSource {
    /// The unmodified HTML text.
    Raw,
}

/// One occurrence of a searched target inside a document.
///
/// `start` and `end` are byte offsets into the searched text, so
/// `&html[hit.start..hit.end] == hit.match_text`. On non-ASCII pages they are
/// larger than the character positions of the same match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorHit {
    pub source: HitSource,
    pub match_text: String,
    pub start: usize,
    pub end: usize,
    /// The match plus up to `context_chars` characters on each side.
    pub snippet: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_serializes_lowercase() {
        let info = FrameworkInfo {
            frameworks_detected: vec![Framework::React, Framework::Nextjs],
            is_spa_like: true,
            is_html_traditional: false,
        };

        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains(r#""frameworks_detected":["react","nextjs"]"#));
        assert!(info.detected(Framework::Nextjs));
        assert!(!info.detected(Framework::Vue));
    }

    #[test]
    fn test_fetch_result_skips_absent_body() {
        let result = FetchResult {
            url: "https://example.com".to_string(),
            size_bytes: 42,
            signals: Signals::default(),
            framework: FrameworkInfo::default(),
            body: None,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("body"));
        let back: FetchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_hit_source_serializes_raw() {
        let hit = LocatorHit {
            source: HitSource::Raw,
            match_text: "555".to_string(),
            start: 0,
            end: 3,
            snippet: "555".to_string(),
        };

        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains(r#""source":"raw""#));
    }

    #[test]
    fn test_framework_display() {
        let names: Vec<String> = Framework::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(names, vec!["react", "vue", "angular", "nextjs"]);
    }
}
