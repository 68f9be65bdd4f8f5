//! Search query expressions sent to the literature service.

use std::fmt;

use super::TrackedAuthor;

/// Field the service sorts results by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortCriterion {
    /// Date the first version was submitted
    #[default]
    SubmittedDate,
    /// Date of the latest revision
    LastUpdatedDate,
    /// Service relevance score
    Relevance,
}

impl SortCriterion {
    /// Value of the `sortBy` query parameter.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::SubmittedDate => "submittedDate",
            Self::LastUpdatedDate => "lastUpdatedDate",
            Self::Relevance => "relevance",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Descending,
    /// Oldest first
    Ascending,
}

impl SortOrder {
    /// Value of the `sortOrder` query parameter.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Descending => "descending",
            Self::Ascending => "ascending",
        }
    }
}

/// A query ready to be executed by a [`SearchService`](crate::client::SearchService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Service query expression, e.g. `au:"Jane Doe" OR au:"John Smith"`.
    pub expression: String,

    /// Maximum results to pull across all pages.
    pub max_results: usize,

    /// Sort field.
    pub sort_by: SortCriterion,

    /// Sort direction.
    pub sort_order: SortOrder,

    /// The single tracked author this query is about; `None` for batched queries.
    pub author: Option<TrackedAuthor>,
}

impl SearchQuery {
    /// Build a query newest-first by submission date.
    #[must_use]
    pub fn new(expression: impl Into<String>, max_results: usize) -> Self {
        Self {
            expression: expression.into(),
            max_results,
            sort_by: SortCriterion::default(),
            sort_order: SortOrder::default(),
            author: None,
        }
    }

    /// Attach the tracked author this query targets.
    #[must_use]
    pub fn for_author(mut self, author: TrackedAuthor) -> Self {
        self.author = Some(author);
        self
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}
