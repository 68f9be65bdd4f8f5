//! Feed pipeline: roster in, ranked papers out.
//!
//! Stages run in this order for every query, strictly one query at a time:
//! category filter, name matching, record assembly. Once every query is
//! drained the papers are sorted newest first, deduplicated by title, ranked
//! and truncated.

pub mod assemble;
pub mod filter;
pub mod matcher;
pub mod merge;
pub mod query;
pub mod rank;

use futures::TryStreamExt;
use tracing::{info, warn};

use crate::client::SearchService;
use crate::config::{FeedConfig, SearchFailurePolicy};
use crate::error::{ClientResult, FeedError, FeedResult};
use crate::models::{Paper, SearchQuery, TrackedAuthor};

pub use assemble::{assemble, format_published, truncate_summary};
pub use matcher::{NameMatcher, match_authors, normalize};
pub use merge::{Deduplicator, MergeOutcome};
pub use query::build_queries;
pub use rank::rank;

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Queries issued, including failed ones.
    pub queries: usize,
    /// Raw results received from successful queries.
    pub results: usize,
    /// Results dropped by the category filter.
    pub off_category: usize,
    /// Results dropped because no tracked author matched.
    pub unmatched: usize,
    /// Papers folded into an existing record with the same title.
    pub merged: usize,
    /// Authors whose query failed and was skipped.
    pub skipped_authors: Vec<TrackedAuthor>,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct FeedOutput {
    /// Ranked, deduplicated, truncated papers.
    pub papers: Vec<Paper>,
    /// Run counters.
    pub report: RunReport,
}

#[derive(Debug, Default)]
struct QueryYield {
    papers: Vec<Paper>,
    results: usize,
    off_category: usize,
    unmatched: usize,
}

/// Runs the feed against a search service with a fixed configuration.
#[derive(Debug)]
pub struct FeedPipeline<S> {
    search: S,
    config: FeedConfig,
}

impl<S: SearchService> FeedPipeline<S> {
    /// Create a pipeline.
    #[must_use]
    pub fn new(search: S, config: FeedConfig) -> Self {
        Self { search, config }
    }

    /// The configuration this pipeline was built with.
    #[must_use]
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Run every query for `roster` and produce the ranked feed.
    ///
    /// # Errors
    ///
    /// [`FeedError::RosterUnavailable`] for an empty roster (no query is issued),
    /// [`FeedError::SearchServiceFailure`] when a query fails and the failure
    /// policy does not allow skipping it.
    pub async fn run(&self, roster: &[TrackedAuthor]) -> FeedResult<FeedOutput> {
        if roster.is_empty() {
            return Err(FeedError::roster_unavailable("roster contains no authors"));
        }

        let roster = distinct(roster);
        let matcher = NameMatcher::new(&roster);
        let queries = build_queries(&roster, &self.config);

        info!(
            authors = roster.len(),
            queries = queries.len(),
            strategy = ?self.config.strategy,
            "Starting feed run"
        );

        let mut report = RunReport::default();
        let mut collected = Vec::new();

        for query in &queries {
            report.queries += 1;

            match self.collect(query, &matcher).await {
                Ok(batch) => {
                    info!(
                        query = %query,
                        results = batch.results,
                        kept = batch.papers.len(),
                        "Query finished"
                    );
                    report.results += batch.results;
                    report.off_category += batch.off_category;
                    report.unmatched += batch.unmatched;
                    collected.extend(batch.papers);
                }
                Err(source) => match (self.config.on_search_failure, &query.author) {
                    (SearchFailurePolicy::SkipAuthor, Some(author)) => {
                        warn!(author = %author, error = %source, "Skipping author after search failure");
                        report.skipped_authors.push(author.clone());
                    }
                    _ => return Err(FeedError::search(query.expression.clone(), source)),
                },
            }
        }

        rank::sort_by_recency(&mut collected);

        let mut dedup = Deduplicator::new(self.config.title_match);
        for paper in collected {
            if let MergeOutcome::Merged { .. } = dedup.push(paper) {
                report.merged += 1;
            }
        }

        let papers = rank(dedup.into_papers(), self.config.output_limit);

        info!(
            papers = papers.len(),
            results = report.results,
            off_category = report.off_category,
            unmatched = report.unmatched,
            merged = report.merged,
            skipped = report.skipped_authors.len(),
            "Feed run complete"
        );

        Ok(FeedOutput { papers, report })
    }

    /// Drain one query's stream through filter, matcher and assembler.
    async fn collect(&self, query: &SearchQuery, matcher: &NameMatcher) -> ClientResult<QueryYield> {
        let mut stream = self.search.search(query);
        let mut batch = QueryYield::default();

        while let Some(raw) = stream.try_next().await? {
            batch.results += 1;

            if !filter::is_allowed(&raw, &self.config.categories) {
                batch.off_category += 1;
                continue;
            }

            // A per-author query already names its author.
            let matched = match &query.author {
                Some(author) => vec![author.clone()],
                None => matcher.match_authors(&raw.authors),
            };

            match assemble(raw, matched, self.config.max_abstract_len) {
                Some(paper) => batch.papers.push(paper),
                None => batch.unmatched += 1,
            }
        }

        Ok(batch)
    }
}

/// Roster with repeated names removed, first occurrence wins.
fn distinct(roster: &[TrackedAuthor]) -> Vec<TrackedAuthor> {
    let mut seen = std::collections::HashSet::new();
    roster.iter().filter(|author| seen.insert(author.as_str())).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_keeps_first_occurrence() {
        let roster: Vec<TrackedAuthor> =
            ["B", "A", "B", "C", "A"].iter().map(|n| TrackedAuthor::new(*n)).collect();
        let names: Vec<String> = distinct(&roster).iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
