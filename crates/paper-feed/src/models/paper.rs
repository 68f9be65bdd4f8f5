//! Paper records: raw search results and the canonical feed entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrackedAuthor;

/// A single entry as returned by the search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    /// Paper title as reported by the service.
    pub title: String,

    /// Author names in source order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Abstract text.
    #[serde(default)]
    pub summary: String,

    /// Declared subject categories (e.g. "cs.CL").
    #[serde(default)]
    pub categories: Vec<String>,

    /// First-version publication timestamp.
    pub published: DateTime<Utc>,

    /// Abstract page URL; also the entry id.
    pub entry_url: String,

    /// PDF URL.
    pub pdf_url: String,
}

impl RawResult {
    /// Check whether any declared category is in the given allow-list.
    #[must_use]
    pub fn has_any_category<S>(&self, allowed: &std::collections::BTreeSet<S>) -> bool
    where
        S: std::borrow::Borrow<str> + Ord,
    {
        self.categories.iter().any(|c| allowed.contains(c.as_str()))
    }
}

/// A paper in the published feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paper {
    /// Paper title; the deduplication key.
    pub title: String,

    /// Full author list as reported by the source.
    pub authors: Vec<String>,

    /// Abstract, truncated to the configured cap.
    pub summary: String,

    /// Short display date without the year (e.g. "Mar 05").
    pub published: String,

    /// Original timestamp, kept for ranking only.
    #[serde(skip)]
    pub published_raw: DateTime<Utc>,

    /// PDF URL.
    pub pdf_url: String,

    /// Abstract page URL; stable identifier.
    pub arxiv_url: String,

    /// First tracked author that matched.
    pub queried_author: TrackedAuthor,

    /// Every tracked author matched to this paper, first-seen order.
    pub matching_authors: Vec<TrackedAuthor>,
}

impl Paper {
    /// Check whether a source author name is one of the matched tracked authors.
    ///
    /// Compares the literal strings, as the page highlights them.
    #[must_use]
    pub fn is_matching_author(&self, name: &str) -> bool {
        self.matching_authors.iter().any(|a| a.as_str() == name)
    }

    /// Append tracked authors not already present, keeping first-seen order.
    ///
    /// Returns how many were added.
    pub fn absorb_matches<'a, I>(&mut self, authors: I) -> usize
    where
        I: IntoIterator<Item = &'a TrackedAuthor>,
    {
        let mut added = 0;
        for author in authors {
            if !self.matching_authors.contains(author) {
                self.matching_authors.push(author.clone());
                added += 1;
            }
        }
        added
    }
}
