//! Configuration for the arXiv client and the feed pipeline.
//!
//! Both structs are built once and passed into the component that owns them;
//! nothing here is mutated during a run.

use std::collections::BTreeSet;
use std::time::Duration;

/// arXiv API constants.
pub mod arxiv {
    use std::time::Duration;

    /// arXiv query endpoint (Atom feed).
    pub const API_URL: &str = "https://export.arxiv.org/api/query";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Results per page.
    pub const PAGE_SIZE: usize = 100;

    /// Minimum delay between consecutive requests (arXiv asks for 3 seconds).
    pub const PAGE_DELAY: Duration = Duration::from_secs(3);

    /// Retries on transient failures before a query is considered failed.
    pub const MAX_RETRIES: u32 = 3;
}

/// Feed defaults.
pub mod defaults {
    /// Subject categories a paper must carry at least one of.
    pub const CATEGORIES: &[&str] = &["cs.LG", "cs.AI", "cs.CL", "cs.HC", "stat.ML"];

    /// Abstract character cap.
    pub const MAX_ABSTRACT_LEN: usize = 1600;

    /// Result cap for each per-author query.
    pub const PER_AUTHOR_LIMIT: usize = 100;

    /// Result cap for the single batched query.
    pub const BATCHED_LIMIT: usize = 2000;

    /// Papers kept in the final feed (infinite-scroll pool).
    pub const OUTPUT_LIMIT: usize = 500;

    /// Papers rendered into the static page.
    pub const HTML_PAPERS: usize = 20;

    /// Authors listed per paper in the page before "et al.".
    pub const HTML_MAX_AUTHORS: usize = 50;
}

/// How the roster is turned into search queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryStrategy {
    /// One query per tracked author
    #[default]
    PerAuthor,
    /// One OR-combined query for the whole roster
    Batched,
}

/// What a failed per-author query does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchFailurePolicy {
    /// Abort the whole run
    #[default]
    Abort,
    /// Drop the failing author's results and continue
    SkipAuthor,
}

/// How titles are compared when merging duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TitleMatch {
    /// Byte-for-byte equality
    #[default]
    Exact,
    /// Case-folded with whitespace runs collapsed
    Normalized,
}

/// Search client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// arXiv API URL (for testing with mock servers).
    pub api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Results requested per page.
    pub page_size: usize,

    /// Minimum delay between consecutive requests.
    pub page_delay: Duration,

    /// Retries on transient failures.
    pub max_retries: u32,
}

impl Config {
    /// Create a configuration pointing at the given API URL.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout: arxiv::REQUEST_TIMEOUT,
            connect_timeout: arxiv::CONNECT_TIMEOUT,
            page_size: arxiv::PAGE_SIZE,
            page_delay: arxiv::PAGE_DELAY,
            max_retries: arxiv::MAX_RETRIES,
        }
    }

    /// Create a test configuration with a custom URL for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_url: format!("{}/api/query", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            page_size: arxiv::PAGE_SIZE,
            page_delay: Duration::from_millis(0), // No delay in tests
            max_retries: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `ARXIV_API_URL`, `ARXIV_PAGE_SIZE`, `ARXIV_PAGE_DELAY_MS` and
    /// `ARXIV_MAX_RETRIES`; anything unset keeps its default.
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config =
            Self::new(std::env::var("ARXIV_API_URL").unwrap_or_else(|_| arxiv::API_URL.into()));

        if let Some(size) = env_parse::<usize>("ARXIV_PAGE_SIZE")? {
            config.page_size = size;
        }
        if let Some(ms) = env_parse::<u64>("ARXIV_PAGE_DELAY_MS")? {
            config.page_delay = Duration::from_millis(ms);
        }
        if let Some(retries) = env_parse::<u32>("ARXIV_MAX_RETRIES")? {
            config.max_retries = retries;
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(arxiv::API_URL)
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Query construction strategy.
    pub strategy: QueryStrategy,

    /// Behaviour when a per-author query fails.
    pub on_search_failure: SearchFailurePolicy,

    /// Allowed subject categories.
    pub categories: BTreeSet<String>,

    /// Abstract character cap.
    pub max_abstract_len: usize,

    /// Result cap per author query.
    pub per_author_limit: usize,

    /// Result cap for the batched query.
    pub batched_limit: usize,

    /// Papers kept after ranking.
    pub output_limit: usize,

    /// Title comparison used by the merger.
    pub title_match: TitleMatch,

    /// Papers rendered into the HTML page.
    pub html_papers: usize,

    /// Authors listed per paper in the HTML page.
    pub html_max_authors: usize,
}

impl FeedConfig {
    /// Set the query strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: QueryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: SearchFailurePolicy) -> Self {
        self.on_search_failure = policy;
        self
    }

    /// Set the title comparison.
    #[must_use]
    pub fn with_title_match(mut self, title_match: TitleMatch) -> Self {
        self.title_match = title_match;
        self
    }

    /// Replace the category allow-list.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Result cap for a single query under the current strategy.
    #[must_use]
    pub const fn query_limit(&self) -> usize {
        match self.strategy {
            QueryStrategy::PerAuthor => self.per_author_limit,
            QueryStrategy::Batched => self.batched_limit,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `FEED_CATEGORIES` (comma-separated), `FEED_MAX_ABSTRACT_LEN`,
    /// `FEED_PER_AUTHOR_LIMIT`, `FEED_BATCHED_LIMIT` and `FEED_OUTPUT_LIMIT`.
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("FEED_CATEGORIES") {
            let categories: BTreeSet<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
            if !categories.is_empty() {
                config.categories = categories;
            }
        }
        if let Some(len) = env_parse("FEED_MAX_ABSTRACT_LEN")? {
            config.max_abstract_len = len;
        }
        if let Some(limit) = env_parse("FEED_PER_AUTHOR_LIMIT")? {
            config.per_author_limit = limit;
        }
        if let Some(limit) = env_parse("FEED_BATCHED_LIMIT")? {
            config.batched_limit = limit;
        }
        if let Some(limit) = env_parse("FEED_OUTPUT_LIMIT")? {
            config.output_limit = limit;
        }

        Ok(config)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            strategy: QueryStrategy::default(),
            on_search_failure: SearchFailurePolicy::default(),
            categories: defaults::CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
            max_abstract_len: defaults::MAX_ABSTRACT_LEN,
            per_author_limit: defaults::PER_AUTHOR_LIMIT,
            batched_limit: defaults::BATCHED_LIMIT,
            output_limit: defaults::OUTPUT_LIMIT,
            title_match: TitleMatch::default(),
            html_papers: defaults::HTML_PAPERS,
            html_max_authors: defaults::HTML_MAX_AUTHORS,
        }
    }
}

fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, arxiv::API_URL);
        assert_eq!(config.page_delay, Duration::from_secs(3));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_config_for_testing_has_no_delay() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.api_url, "http://127.0.0.1:9999/api/query");
        assert_eq!(config.page_delay, Duration::ZERO);
    }

    #[test]
    fn test_feed_config_default() {
        let config = FeedConfig::default();
        assert_eq!(config.strategy, QueryStrategy::PerAuthor);
        assert_eq!(config.on_search_failure, SearchFailurePolicy::Abort);
        assert_eq!(config.title_match, TitleMatch::Exact);
        assert_eq!(config.max_abstract_len, 1600);
        assert_eq!(config.output_limit, 500);
        assert!(config.categories.contains("stat.ML"));
        assert_eq!(config.categories.len(), 5);
    }

    #[test]
    fn test_query_limit_follows_strategy() {
        let config = FeedConfig::default();
        assert_eq!(config.query_limit(), defaults::PER_AUTHOR_LIMIT);

        let config = config.with_strategy(QueryStrategy::Batched);
        assert_eq!(config.query_limit(), defaults::BATCHED_LIMIT);
    }

    #[test]
    fn test_with_categories_replaces_allow_list() {
        let config = FeedConfig::default().with_categories(["q-bio.NC"]);
        assert_eq!(config.categories.len(), 1);
        assert!(config.categories.contains("q-bio.NC"));
    }
}
