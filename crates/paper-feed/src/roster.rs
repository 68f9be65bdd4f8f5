//! Roster sources.
//!
//! The roster is untrusted remote data: a JSON array of author names, parsed
//! strictly. Anything else is rejected.

use std::path::PathBuf;

use tracing::info;
use url::Url;

use crate::error::{FeedError, FeedResult};
use crate::models::TrackedAuthor;

/// Supplies the ordered list of tracked authors.
#[async_trait::async_trait]
pub trait RosterProvider: Send + Sync {
    /// Fetch and validate the roster.
    async fn fetch(&self) -> FeedResult<Vec<TrackedAuthor>>;
}

/// Parse roster content.
///
/// The content must be a JSON array of non-blank strings. Names are trimmed of
/// surrounding whitespace; order is preserved.
///
/// # Errors
///
/// [`FeedError::RosterMalformed`] if the content is not an array of non-blank
/// strings, [`FeedError::RosterUnavailable`] if the array is empty.
pub fn parse_roster(content: &str) -> FeedResult<Vec<TrackedAuthor>> {
    let names: Vec<String> = serde_json::from_str(content)
        .map_err(|e| FeedError::roster_malformed(format!("expected a JSON array of names: {e}")))?;

    if names.is_empty() {
        return Err(FeedError::roster_unavailable("roster contains no authors"));
    }

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(FeedError::roster_malformed(format!("entry {i} is blank")))
            } else {
                Ok(TrackedAuthor::new(trimmed))
            }
        })
        .collect()
}

/// Roster served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpRoster {
    client: reqwest::Client,
    url: Url,
}

impl HttpRoster {
    /// Create a provider for the given URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { client: reqwest::Client::new(), url }
    }
}

#[async_trait::async_trait]
impl RosterProvider for HttpRoster {
    async fn fetch(&self) -> FeedResult<Vec<TrackedAuthor>> {
        info!(url = %self.url, "Fetching roster");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FeedError::roster_unavailable(format!("{}: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::roster_unavailable(format!(
                "{} returned {}",
                self.url,
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::roster_unavailable(format!("{}: {e}", self.url)))?;

        parse_roster(&body)
    }
}

/// Roster stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileRoster {
    path: PathBuf,
}

impl FileRoster {
    /// Create a provider reading the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl RosterProvider for FileRoster {
    async fn fetch(&self) -> FeedResult<Vec<TrackedAuthor>> {
        info!(path = %self.path.display(), "Reading roster");

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            FeedError::roster_unavailable(format!("{}: {e}", self.path.display()))
        })?;

        parse_roster(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster_preserves_order() {
        let roster = parse_roster(r#"["Jane Doe", " John Smith ", "Ann Lee"]"#).unwrap();
        let names: Vec<&str> = roster.iter().map(TrackedAuthor::as_str).collect();
        assert_eq!(names, vec!["Jane Doe", "John Smith", "Ann Lee"]);
    }

    #[test]
    fn test_empty_roster_is_unavailable() {
        let err = parse_roster("[]").unwrap_err();
        assert!(matches!(err, FeedError::RosterUnavailable(_)));
    }

    #[test]
    fn test_non_array_is_malformed() {
        for content in [
            r#"{"researchers": ["Jane Doe"]}"#,
            r#"ARXIV_RESEARCHERS = ["Jane Doe"]"#,
            r#"["Jane Doe", 42]"#,
            "",
        ] {
            let err = parse_roster(content).unwrap_err();
            assert!(matches!(err, FeedError::RosterMalformed(_)), "{content:?} -> {err}");
        }
    }

    #[test]
    fn test_blank_name_is_malformed() {
        let err = parse_roster(r#"["Jane Doe", "   "]"#).unwrap_err();
        assert!(matches!(err, FeedError::RosterMalformed(_)));
        assert!(err.to_string().contains("entry 1"));
    }
}
