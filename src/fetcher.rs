//! Bounded-concurrency page fetching.
//!
//! [`Fetcher`] turns a list of URLs into analyzed [`FetchResult`]s. Each page
//! waits a random politeness delay, is fetched once with a timeout, decoded
//! lossily and run through signal and framework detection.
//!
//! Batches are best effort: a page that fails for any reason is logged and
//! left out, it never aborts or delays the other fetches. Results arrive in
//! completion order, not input order.
//!
//! The network side sits behind the [`PageSource`] trait so the pipeline can
//! be driven by something other than HTTP (tests use an in-memory source).

use crate::error::FetchError;
use crate::models::{FetchResult, FrameworkInfo, Signals};
use crate::signals::{detect_framework, detect_signals};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use rand::{Rng, rng};
use reqwest::Client;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::task::spawn_blocking;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// How pages are fetched. Built once and shared by every in-flight fetch.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Sent as the `User-Agent` header on every request.
    pub user_agent: String,
    /// Timeout for a single page fetch.
    pub page_timeout: Duration,
    /// Timeout for a search-engine query.
    pub search_timeout: Duration,
    /// Lower bound of the politeness delay before each fetch.
    pub jitter_min: Duration,
    /// Upper bound of the politeness delay before each fetch.
    pub jitter_max: Duration,
    /// Upper bound on in-flight fetches when the caller does not pick one.
    pub default_concurrency: NonZeroUsize,
    /// Keep the decoded HTML on each result.
    pub keep_body: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_timeout: Duration::from_secs(12),
            search_timeout: Duration::from_secs(10),
            jitter_min: Duration::from_secs(1),
            jitter_max: Duration::from_secs(3),
            default_concurrency: NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN),
            keep_body: true,
        }
    }
}

impl FetchPolicy {
    /// The same policy with the politeness delay switched off.
    pub fn without_jitter(mut self) -> Self {
        self.jitter_min = Duration::ZERO;
        self.jitter_max = Duration::ZERO;
        self
    }

    /// A random delay in `jitter_min..=jitter_max`.
    pub fn jitter(&self) -> Duration {
        let min = self.jitter_min.as_millis() as u64;
        let max = self.jitter_max.as_millis() as u64;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rng().random_range(min..=max))
    }

    /// In-flight bound for a batch of `batch_len` URLs.
    pub fn concurrency_for(&self, batch_len: usize, requested: Option<NonZeroUsize>) -> usize {
        match requested {
            Some(limit) => limit.get(),
            None => self.default_concurrency.get().min(batch_len.max(1)),
        }
    }
}

/// Decode a raw body and run signal and framework detection over it.
fn analyze(bytes: &[u8]) -> (String, Signals, FrameworkInfo) {
    let html = String::from_utf8_lossy(bytes).into_owned();
    let signals = detect_signals(&html);
    let framework = detect_framework(&html);
    (html, signals, framework)
}

/// Build the HTTP client shared by page fetches and search discovery.
pub fn build_client(policy: &FetchPolicy) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(policy.user_agent.as_str()).build()
}

/// Something that can return the raw body of a URL.
///
/// Implementations must fail on non-success responses so that only real
/// pages reach analysis.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`PageSource`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    timeout: Duration,
}

impl HttpSource {
    /// `timeout` applies to each request on top of the client's own settings.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Fetches and analyzes pages with a bounded number in flight.
#[derive(Debug)]
pub struct Fetcher<S = HttpSource> {
    source: S,
    policy: FetchPolicy,
}

impl Fetcher<HttpSource> {
    /// A fetcher talking HTTP through a freshly built client.
    pub fn new(policy: FetchPolicy) -> Result<Self, FetchError> {
        let client = build_client(&policy)?;
        Ok(Self::from_client(client, policy))
    }

    /// A fetcher reusing an existing client (and its connection pool).
    pub fn from_client(client: Client, policy: FetchPolicy) -> Self {
        let source = HttpSource::new(client, policy.page_timeout);
        Self { source, policy }
    }

    pub fn client(&self) -> &Client {
        self.source.client()
    }
}

impl<S: PageSource> Fetcher<S> {
    /// A fetcher reading pages from any [`PageSource`].
    pub fn with_source(source: S, policy: FetchPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetch and analyze one page.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_page(&self, url: &str) -> Result<FetchResult, FetchError> {
        let delay = self.policy.jitter();
        if !delay.is_zero() {
            debug!(?delay, "Politeness delay");
            sleep(delay).await;
        }

        let bytes = self.source.fetch(url).await?;
        let size_bytes = bytes.len();
        // html5ever parsing is CPU bound
        let (html, signals, framework) = spawn_blocking(move || analyze(&bytes))
            .await
            .map_err(|e| FetchError::Source {
                url: url.to_string(),
                reason: format!("analysis failed: {e}"),
            })?;

        Ok(FetchResult {
            url: url.to_string(),
            size_bytes,
            signals,
            framework,
            body: self.policy.keep_body.then_some(html),
        })
    }

    /// Fetch a batch, returning whatever succeeded in completion order.
    ///
    /// `max_concurrency` defaults to `min(10, urls.len())`. Repeated URLs are
    /// fetched once.
    pub async fn fetch_many(
        &self,
        urls: &[String],
        max_concurrency: Option<NonZeroUsize>,
    ) -> Vec<FetchResult> {
        self.fetch_many_with(urls, max_concurrency, |_, _| {}).await
    }

    /// Like [`Fetcher::fetch_many`], calling `on_complete` as each URL
    /// finishes, successful or not. Meant for progress reporting.
    ///
    /// # Arguments
    ///
    /// * `urls` - Pages to fetch; repeats are fetched once
    /// * `max_concurrency` - In-flight bound, `min(10, urls.len())` when `None`
    /// * `on_complete` - Called once per distinct URL, in completion order
    ///
    /// # Returns
    ///
    /// The successful results in completion order. Failures only reach
    /// `on_complete` and the log.
    #[instrument(level = "info", skip_all, fields(urls = urls.len()))]
    pub async fn fetch_many_with<F>(
        &self,
        urls: &[String],
        max_concurrency: Option<NonZeroUsize>,
        mut on_complete: F,
    ) -> Vec<FetchResult>
    where
        F: FnMut(&str, &Result<FetchResult, FetchError>),
    {
        let urls: Vec<&str> = urls.iter().map(String::as_str).unique().collect();
        if urls.is_empty() {
            return Vec::new();
        }

        let total = urls.len();
        let limit = self.policy.concurrency_for(total, max_concurrency);
        info!(total, limit, "Fetching pages");

        let mut completed = stream::iter(urls)
            .map(|url| async move { (url, self.fetch_page(url).await) })
            .buffer_unordered(limit);

        let mut results = Vec::with_capacity(total);
        while let Some((url, outcome)) = completed.next().await {
            on_complete(url, &outcome);
            match outcome {
                Ok(result) => {
                    debug!(%url, size_bytes = result.size_bytes, "Fetched page");
                    results.push(result);
                }
                Err(e) => warn!(%url, error = %e, "Fetch failed; omitting page"),
            }
        }

        info!(
            total,
            fetched = results.len(),
            failed = total - results.len(),
            "Finished fetching pages"
        );
        results
    }
}
