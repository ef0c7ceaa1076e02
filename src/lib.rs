//! # Contact Scraper
//!
//! Discover candidate pages for a search query, fetch them concurrently and
//! pull contact signals out of noisy real-world HTML.
//!
//! ## Pipeline
//!
//! 1. **Discovery** ([`search`]): a query becomes candidate URLs
//! 2. **Fetching** ([`fetcher`]): pages are fetched with bounded concurrency
//!    and politeness jitter; failures are logged and left out
//! 3. **Signals** ([`signals`]): emails, phones, contact keywords and SPA
//!    framework fingerprints, straight from the raw HTML
//! 4. **Text** ([`cleaner`]): deduplicated human-readable lines, with
//!    Cloudflare-protected emails ([`obfuscation`]) decoded
//! 5. **Locating** ([`locator`]): find a phone number or phrase in a page with
//!    surrounding context
//!
//! The library never prints and never installs a subscriber; it emits
//! `tracing` events and returns plain data.
//!
//! ```no_run
//! use contact_scraper::{FetchPolicy, Fetcher, extract_text};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new(FetchPolicy::default())?;
//! let urls = vec!["https://example.com".to_string()];
//! for page in fetcher.fetch_many(&urls, None).await {
//!     println!("{} emails: {:?}", page.url, page.signals.emails_found);
//!     if let Some(body) = &page.body {
//!         println!("{}", extract_text(body));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cleaner;
pub mod error;
pub mod fetcher;
pub mod locator;
pub mod models;
pub mod obfuscation;
pub mod search;
pub mod signals;
pub mod utils;

pub use cleaner::extract_text;
pub use error::{FetchError, SearchError};
pub use fetcher::{FetchPolicy, Fetcher, HttpSource, PageSource};
pub use locator::find_occurrences;
pub use models::{FetchResult, Framework, FrameworkInfo, HitSource, LocatorHit, Signals};
pub use obfuscation::decode_cloudflare_email;
pub use search::DuckDuckGo;
pub use signals::{detect_framework, detect_signals, is_valid_phone};
