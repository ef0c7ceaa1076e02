//! # Contact Scraper
//!
//! Finds pages for a search query (or takes URLs directly), fetches them
//! concurrently and reports the contact signals found in each one.
//!
//! ## Usage
//!
//! ```sh
//! contact_scraper "taquería aguascalientes" -n 10 -j ./json -t ./text
//! contact_scraper -u https://tienda.mx --find "449 805 5337"
//! ```
//!
//! ## Pipeline
//!
//! 1. **Discovery**: DuckDuckGo results for the query, unless `--url` is given
//! 2. **Fetching**: pages fetched with bounded concurrency; failures are logged
//! 3. **Locating**: optional `--find` target searched in every page
//! 4. **Output**: JSON report (file or stdout) and optional text dumps

use clap::{CommandFactory, Parser, error::ErrorKind};
use contact_scraper::fetcher::build_client;
use contact_scraper::utils::truncate_for_log;
use contact_scraper::{DuckDuckGo, Fetcher, find_occurrences};
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod outputs;

use cli::Cli;
use outputs::json::{PageReport, ScrapeReport};
use outputs::{json, text};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    if !args.has_input() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "give a search query or at least one --url",
            )
            .exit();
    }
    debug!(?args, "Parsed CLI arguments");

    let policy = args.fetch_policy();
    let client = build_client(&policy)?;
    let fetcher = Fetcher::from_client(client, policy);

    // ---- Discover URLs ----
    let urls = if args.urls.is_empty() {
        let query = args.query.as_deref().unwrap_or_default();
        let search = DuckDuckGo::new(fetcher.client().clone(), fetcher.policy().search_timeout)
            .with_region(args.region.as_str());
        match search.search(query, args.sites).await {
            Ok(urls) => urls,
            Err(e) => {
                error!(%query, error = %e, "Search failed");
                return Err(e.into());
            }
        }
    } else {
        args.urls.clone()
    };

    if urls.is_empty() {
        warn!("No URLs to fetch");
    }

    // ---- Fetch ----
    let total = urls.len();
    let mut done = 0;
    let mut timed_out = 0;
    let pages = fetcher
        .fetch_many_with(&urls, args.concurrency, |url, outcome| {
            done += 1;
            match outcome {
                Ok(page) => info!(
                    done,
                    total,
                    %url,
                    emails = page.signals.emails_found.len(),
                    phones = page.signals.phones_found.len(),
                    "Fetched"
                ),
                Err(e) if e.is_timeout() => {
                    timed_out += 1;
                    warn!(done, total, %url, timeout = ?fetcher.policy().page_timeout, "Timed out");
                }
                Err(e) => warn!(done, total, %url, error = %e, "Failed"),
            }
        })
        .await;

    // ---- Locate + report ----
    let reports = pages
        .iter()
        .map(|page| {
            let hits = match (&args.find, &page.body) {
                (Some(target), Some(body)) => find_occurrences(target, body, args.context),
                _ => Vec::new(),
            };
            if let Some(first) = hits.first() {
                info!(
                    url = %page.url,
                    hits = hits.len(),
                    snippet = %truncate_for_log(&first.snippet, 200),
                    "Target located"
                );
            }
            PageReport::new(page, hits)
        })
        .collect();
    let report = ScrapeReport::new(args.query.clone(), reports);

    match &args.json_output_dir {
        Some(dir) => {
            if let Err(e) = json::write_report(&report, dir).await {
                error!(path = %dir, error = %e, "Failed to write JSON report");
                return Err(e);
            }
        }
        None => json::print_report(&report)?,
    }

    if let Some(dir) = &args.text_output_dir {
        if let Err(e) = text::write_texts(&pages, dir).await {
            error!(path = %dir, error = %e, "Failed to write text dumps");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        fetched = pages.len(),
        failed = total - pages.len(),
        timed_out,
        "Execution complete"
    );

    Ok(())
}
