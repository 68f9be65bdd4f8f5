//! arXiv search client.
//!
//! Provides async HTTP client with:
//! - Retry middleware with exponential backoff (bounded retry count)
//! - Minimum delay between consecutive requests
//! - Lazy pagination exposed as a stream of [`RawResult`]s

pub mod atom;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use futures::stream::BoxStream;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{RawResult, SearchQuery};

pub use atom::AtomPage;
pub use middleware::Pacer;

/// A literature service that turns a query into a lazily paginated result sequence.
///
/// Consuming the stream may suspend while the next page is fetched. A failure
/// ends the stream with an error item.
pub trait SearchService {
    /// Stream every result for `query`, newest first, up to `query.max_results`.
    fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxStream<'a, ClientResult<RawResult>>;
}

impl<T: SearchService + ?Sized> SearchService for &T {
    fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxStream<'a, ClientResult<RawResult>> {
        (**self).search(query)
    }
}

/// arXiv API client.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Query endpoint.
    api_url: String,

    /// Results requested per page.
    page_size: usize,

    /// Shared request pacing.
    pacer: Arc<Pacer>,

    /// Refetches of a page that came back empty too early.
    max_retries: u32,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_url: config.api_url,
            page_size: config.page_size.max(1),
            pacer: Arc::new(Pacer::new(config.page_delay)),
            max_retries: config.max_retries,
        })
    }

    /// Fetch one page of results.
    ///
    /// # Errors
    ///
    /// Returns error on API failure or a malformed feed.
    pub async fn fetch_page(
        &self,
        query: &SearchQuery,
        start: usize,
        max_results: usize,
    ) -> ClientResult<AtomPage> {
        let params = [
            ("search_query", query.expression.clone()),
            ("start", start.to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", query.sort_by.as_param().to_string()),
            ("sortOrder", query.sort_order.as_param().to_string()),
        ];

        self.pacer.wait().await;
        debug!(query = %query, start, max_results, "Fetching arXiv page");

        let response = self.client.get(&self.api_url).query(&params).send().await?;
        let response = handle_response(response).await?;
        let body = response.text().await?;

        atom::parse_feed(&body)
    }
}

impl SearchService for ArxivClient {
    fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxStream<'a, ClientResult<RawResult>> {
        Box::pin(async_stream::try_stream! {
            let mut start = 0;
            let mut yielded = 0;

            while yielded < query.max_results {
                let want = self.page_size.min(query.max_results - yielded);
                let mut page = self.fetch_page(query, start, want).await?;

                let mut attempts = 1;
                while let Some(total) = missing_results(&page, start) {
                    if attempts > self.max_retries {
                        Err::<(), _>(ClientError::IncompletePage { start, total, attempts })?;
                    }
                    warn!(query = %query, start, total, attempts, "Empty page before end of results, refetching");
                    attempts += 1;
                    page = self.fetch_page(query, start, want).await?;
                }

                let received = page.entries.len();
                debug!(query = %query, start, received, total = ?page.total_results, "Received arXiv page");

                for entry in page.entries {
                    if yielded >= query.max_results {
                        break;
                    }
                    yielded += 1;
                    yield entry;
                }

                start += received;
                if received == 0 || page.total_results.is_some_and(|total| start >= total) {
                    break;
                }
            }
        })
    }
}

/// Reported total when `page` is empty even though results past `start` remain.
///
/// arXiv occasionally answers a valid offset with an empty page; asking again
/// usually returns it. An empty first page is a genuine empty result.
fn missing_results(page: &AtomPage, start: usize) -> Option<usize> {
    if !page.entries.is_empty() || start == 0 {
        return None;
    }
    page.total_results.filter(|&total| start < total)
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient")
            .field("api_url", &self.api_url)
            .field("page_size", &self.page_size)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Handle API response status codes.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}
