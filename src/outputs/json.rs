//! JSON scrape report.
//!
//! The report lists every page that was fetched, with its signals, framework
//! fingerprints and (when `--find` was given) located hits. Bodies are never
//! included.
//!
//! Files are named by date and query:
//! ```text
//! json_output_dir/
//! └── 2025-05-06_taqueria-centro.json
//! ```

use super::ensure_writable_dir;
use chrono::{DateTime, Local, Utc};
use contact_scraper::utils::slugify_url;
use contact_scraper::{FetchResult, FrameworkInfo, LocatorHit, Signals};
use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// One fetched page in the report.
#[derive(Debug, Serialize)]
pub struct PageReport {
    pub url: String,
    pub size_bytes: usize,
    pub signals: Signals,
    pub framework: FrameworkInfo,
    pub hits: Vec<LocatorHit>,
}

impl PageReport {
    pub fn new(page: &FetchResult, hits: Vec<LocatorHit>) -> Self {
        Self {
            url: page.url.clone(),
            size_bytes: page.size_bytes,
            signals: page.signals.clone(),
            framework: page.framework.clone(),
            hits,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScrapeReport {
    /// The search query, absent when URLs were given directly.
    pub query: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub pages: Vec<PageReport>,
}

impl ScrapeReport {
    pub fn new(query: Option<String>, pages: Vec<PageReport>) -> Self {
        Self {
            query,
            generated_at: Utc::now(),
            pages,
        }
    }

    /// `<date>_<query slug>.json`, or `<date>_urls.json` without a query.
    pub fn file_name(&self) -> String {
        let slug = self
            .query
            .as_deref()
            .map(slugify_url)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "urls".to_string());
        format!("{}_{}.json", Local::now().date_naive(), slug)
    }
}

/// Write `report` as pretty JSON into `json_output_dir`, returning the path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &ScrapeReport,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    ensure_writable_dir(json_output_dir).await?;

    let path = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        report.file_name()
    );
    fs::write(&path, json).await?;
    info!(%path, pages = report.pages.len(), "Wrote JSON report");
    Ok(path)
}

/// Print `report` as pretty JSON on stdout.
pub fn print_report(report: &ScrapeReport) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_scraper::HitSource;
    use serde_json::Value;

    fn page() -> FetchResult {
        FetchResult {
            url: "https://tienda.mx".to_string(),
            size_bytes: 1234,
            signals: Signals {
                keywords_found: vec!["contacto".to_string()],
                emails_found: ["ventas@tienda.mx".to_string()].into(),
                phones_found: ["4498055337".to_string()].into(),
                has_email: true,
                has_phone: true,
            },
            framework: FrameworkInfo::default(),
            body: Some("<html>secret body</html>".to_string()),
        }
    }

    #[test]
    fn test_report_shape() {
        let hit = LocatorHit {
            source: HitSource::Raw,
            match_text: "449 805 5337".to_string(),
            start: 8,
            end: 20,
            snippet: "Llámanos 449 805 5337".to_string(),
        };
        let report = ScrapeReport::new(
            Some("tienda centro".to_string()),
            vec![PageReport::new(&page(), vec![hit])],
        );

        let value: Value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["query"], "tienda centro");
        assert!(value["generated_at"].is_string());

        let entry = &value["pages"][0];
        assert_eq!(entry["url"], "https://tienda.mx");
        assert_eq!(entry["size_bytes"], 1234);
        assert_eq!(entry["signals"]["emails_found"][0], "ventas@tienda.mx");
        assert_eq!(entry["framework"]["is_spa_like"], false);
        assert_eq!(entry["hits"][0]["source"], "raw");
        assert_eq!(entry["hits"][0]["start"], 8);
        assert!(entry.get("body").is_none());
    }

    #[test]
    fn test_file_name() {
        let report = ScrapeReport::new(Some("Tacos Al Pastor".to_string()), Vec::new());
        assert!(report.file_name().ends_with("_tacos-al-pastor.json"));

        let report = ScrapeReport::new(None, Vec::new());
        assert!(report.file_name().ends_with("_urls.json"));

        let report = ScrapeReport::new(Some("¿?".to_string()), Vec::new());
        assert!(report.file_name().ends_with("_urls.json"));
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = std::env::temp_dir().join(format!("contact_scraper_json_{}", std::process::id()));
        let dir_str = dir.to_str().unwrap();
        let report = ScrapeReport::new(Some("tienda".to_string()), vec![PageReport::new(&page(), Vec::new())]);

        let path = write_report(&report, dir_str).await.unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["pages"][0]["signals"]["phones_found"][0], "4498055337");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
