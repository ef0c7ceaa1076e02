//! DuckDuckGo HTML search.
//!
//! Uses the JavaScript-free results page at `html.duckduckgo.com`. Result
//! links are either absolute or DuckDuckGo redirects carrying the real
//! destination in a percent-encoded `uddg` query parameter.

use super::is_bad_url;
use crate::error::SearchError;
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DUCKDUCKGO_URL: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_REGION: &str = "mx-es";

static RESULT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("result link selector is valid"));

/// DuckDuckGo client sharing the caller's HTTP client.
#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    client: Client,
    timeout: Duration,
    region: String,
}

impl DuckDuckGo {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            region: DEFAULT_REGION.to_string(),
        }
    }

    /// Search region, sent as the `kl` parameter (e.g. `"us-en"`).
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Return up to `n_sites` distinct, non-ad, non-social result URLs.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&self, query: &str, n_sites: usize) -> Result<Vec<String>, SearchError> {
        let search_url = format!(
            "{DUCKDUCKGO_URL}?q={}&kl={}",
            urlencoding::encode(query),
            urlencoding::encode(&self.region)
        );

        let response = self
            .client
            .get(&search_url)
            .timeout(self.timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        let links = select_links(&html, n_sites);
        info!(count = links.len(), requested = n_sites, "Discovered candidate URLs");
        debug!(urls = ?links, "Search results");
        Ok(links)
    }
}

/// Resolve a result `href` to the destination URL.
///
/// Absolute links pass through, redirect links yield their decoded `uddg`
/// parameter, anything else is dropped.
pub fn extract_real_url(href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }

    let base = Url::parse("https://duckduckgo.com/").ok()?;
    let resolved = base.join(href).ok()?;
    resolved
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())
}

/// Every resolvable result link on a results page, in page order.
pub fn parse_result_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(extract_real_url)
        .collect()
}

/// The first `n_sites` distinct links worth fetching.
pub fn select_links(html: &str, n_sites: usize) -> Vec<String> {
    parse_result_links(html)
        .into_iter()
        .filter(|link| !is_bad_url(link))
        .unique()
        .take(n_sites)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <div class="results">
          <div class="result"><a class="result__a" href="https://duckduckgo.com/y.js?ad_domain=promo.mx&u3=x">Promo</a></div>
          <div class="result"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Ftaqueria.mx%2Fcontacto%3Fa%3D1&amp;rut=abc">Taquería</a></div>
          <div class="result"><a class="result__a" href="https://www.facebook.com/taqueria">Facebook</a></div>
          <div class="result"><a class="result__snippet" href="https://ignored.mx">snippet</a></div>
          <div class="result"><a class="result__a" href="/about">About DuckDuckGo</a></div>
          <div class="result"><a class="result__a" href="https://cocina.com.mx/">Cocina</a></div>
          <div class="result"><a class="result__a" href="https://taqueria.mx/contacto?a=1">Duplicate</a></div>
          <div class="result"><a class="result__a" href="https://tercera.mx">Tercera</a></div>
        </div>
    "#;

    #[test]
    fn test_extract_real_url() {
        assert_eq!(
            extract_real_url("https://example.mx/x").as_deref(),
            Some("https://example.mx/x")
        );
        assert_eq!(
            extract_real_url("/l/?uddg=https%3A%2F%2Fexample.mx%2Fa%20b&rut=1").as_deref(),
            Some("https://example.mx/a b")
        );
        assert_eq!(
            extract_real_url("//duckduckgo.com/l/?kh=-1&uddg=https%3A%2F%2Fexample.mx").as_deref(),
            Some("https://example.mx")
        );
        assert_eq!(extract_real_url("/settings"), None);
        assert_eq!(extract_real_url(""), None);
    }

    #[test]
    fn test_parse_result_links_only_reads_result_anchors() {
        let links = parse_result_links(RESULTS_PAGE);
        assert_eq!(
            links,
            vec![
                "https://duckduckgo.com/y.js?ad_domain=promo.mx&u3=x",
                "https://taqueria.mx/contacto?a=1",
                "https://www.facebook.com/taqueria",
                "https://cocina.com.mx/",
                "https://taqueria.mx/contacto?a=1",
                "https://tercera.mx",
            ]
        );
    }

    #[test]
    fn test_select_links_filters_and_limits() {
        assert_eq!(
            select_links(RESULTS_PAGE, 5),
            vec![
                "https://taqueria.mx/contacto?a=1",
                "https://cocina.com.mx/",
                "https://tercera.mx",
            ]
        );
        assert_eq!(select_links(RESULTS_PAGE, 1), vec!["https://taqueria.mx/contacto?a=1"]);
        assert!(select_links(RESULTS_PAGE, 0).is_empty());
    }

    #[test]
    fn test_empty_results_page() {
        assert!(select_links("<html><body>No results.</body></html>", 5).is_empty());
    }
}
