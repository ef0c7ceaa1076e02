//! Command-line interface definitions.
//!
//! All options can be given as flags; the network knobs also read
//! environment variables.

use clap::Parser;
use contact_scraper::FetchPolicy;
use contact_scraper::fetcher::DEFAULT_USER_AGENT;
use contact_scraper::locator::DEFAULT_CONTEXT_CHARS;
use contact_scraper::search::duckduckgo::DEFAULT_REGION;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Command-line arguments for the contact scraper.
///
/// # Examples
///
/// ```sh
/// # Search, fetch the top 5 results and print a JSON report
/// contact_scraper "taquería aguascalientes contacto"
///
/// # Skip discovery and look for a phone number on known pages
/// contact_scraper -u https://tienda.mx -u https://otra.mx --find "449 805 5337"
///
/// # Write the report and per-page text dumps to disk
/// contact_scraper "florería" -n 10 -j ./json -t ./text
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Free-text search query used to discover pages
    pub query: Option<String>,

    /// Number of search results to fetch
    #[arg(short = 'n', long, default_value_t = 5)]
    pub sites: usize,

    /// Fetch these URLs instead of searching (repeatable)
    #[arg(short, long = "url")]
    pub urls: Vec<String>,

    /// Maximum concurrent fetches (defaults to min(10, number of URLs))
    #[arg(short, long)]
    pub concurrency: Option<NonZeroUsize>,

    /// Per-page fetch timeout in seconds
    #[arg(long, env = "SCRAPER_TIMEOUT_SECS", default_value_t = 12)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "SCRAPER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// DuckDuckGo search region, sent as `kl`
    #[arg(long, env = "SCRAPER_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Skip the random politeness delay before each fetch
    #[arg(long)]
    pub no_jitter: bool,

    /// Directory for the JSON report (printed to stdout when omitted)
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Directory for one extracted-text file per page
    #[arg(short, long)]
    pub text_output_dir: Option<String>,

    /// Phone number or phrase to locate in every fetched page
    #[arg(short, long)]
    pub find: Option<String>,

    /// Context characters around each located match
    #[arg(long, default_value_t = DEFAULT_CONTEXT_CHARS)]
    pub context: usize,
}

impl Cli {
    /// Fetch policy derived from the command line.
    pub fn fetch_policy(&self) -> FetchPolicy {
        let policy = FetchPolicy {
            user_agent: self.user_agent.clone(),
            page_timeout: Duration::from_secs(self.timeout_secs),
            ..FetchPolicy::default()
        };
        if self.no_jitter {
            policy.without_jitter()
        } else {
            policy
        }
    }

    /// Whether there is anything to scrape.
    pub fn has_input(&self) -> bool {
        self.query.is_some() || !self.urls.is_empty()
    }
}
