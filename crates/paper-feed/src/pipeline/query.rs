//! Query construction from the roster.

use crate::config::{FeedConfig, QueryStrategy};
use crate::models::{SearchQuery, TrackedAuthor};

/// Build the search queries for a roster under the configured strategy.
///
/// Per-author mode yields one query per tracked author, in roster order.
/// Batched mode yields a single OR-combined query. An empty roster yields
/// no queries.
#[must_use]
pub fn build_queries(roster: &[TrackedAuthor], config: &FeedConfig) -> Vec<SearchQuery> {
    if roster.is_empty() {
        return Vec::new();
    }

    match config.strategy {
        QueryStrategy::PerAuthor => roster
            .iter()
            .map(|author| {
                SearchQuery::new(author_predicate(author), config.query_limit())
                    .for_author(author.clone())
            })
            .collect(),
        QueryStrategy::Batched => {
            let expression =
                roster.iter().map(author_predicate).collect::<Vec<_>>().join(" OR ");
            vec![SearchQuery::new(expression, config.query_limit())]
        }
    }
}

/// `au:"<name>"`, with any double quotes in the name dropped.
#[must_use]
pub fn author_predicate(author: &TrackedAuthor) -> String {
    format!("au:\"{}\"", author.as_str().replace('"', ""))
}
