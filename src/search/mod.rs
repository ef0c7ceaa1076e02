//! Candidate URL discovery.
//!
//! Discovery is the step before fetching: a free-text query goes to a search
//! engine and comes back as a list of absolute URLs worth scraping.
//!
//! | Engine | Module | Method |
//! |--------|--------|--------|
//! | DuckDuckGo | [`duckduckgo`] | HTML results page scraping |
//!
//! Results are filtered with [`is_bad_url`] so ad redirects and social
//! networks never reach the fetcher.

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGo;

use url::Url;

/// Substrings marking ad and tracker redirects.
pub const BAD_URL_KEYWORDS: &[&str] = &[
    "duckduckgo.com/y.js",
    "bing.com/aclick",
    "doubleclick",
    "ad_domain=",
];

/// Hosts that never carry useful contact pages.
pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "www.facebook.com",
    "m.facebook.com",
    "instagram.com",
    "www.instagram.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "linkedin.com",
];

/// True for ad redirects and social-network URLs.
pub fn is_bad_url(url: &str) -> bool {
    if BAD_URL_KEYWORDS.iter().any(|bad| url.contains(bad)) {
        return true;
    }
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default();
    SOCIAL_DOMAINS.iter().any(|social| host.contains(social))
}
