//! Property-based tests for matching, truncation, dedup and ranking.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use proptest::prelude::*;

use paper_feed::client::SearchService;
use paper_feed::config::{FeedConfig, QueryStrategy, TitleMatch};
use paper_feed::error::ClientResult;
use paper_feed::formatters::html::escape_html;
use paper_feed::models::{Paper, RawResult, SearchQuery, TrackedAuthor};
use paper_feed::pipeline::{Deduplicator, FeedPipeline, NameMatcher, normalize, rank, truncate_summary};
use paper_feed::roster::parse_roster;

/// Returns the same results for every query.
struct FixedSearch(Vec<RawResult>);

impl SearchService for FixedSearch {
    fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxStream<'a, ClientResult<RawResult>> {
        stream::iter(self.0.iter().take(query.max_results).cloned().map(Ok)).boxed()
    }
}

const ROSTER: [&str; 3] = ["Jane Doe", "John Smith", "Ann Lee"];

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{1,8} [A-Z][a-z]{1,10}",
        "[A-Z]\\. [A-Z][a-z]{1,10}",
        "[A-Z][a-z]{1,10}, [A-Z][a-z]{1,8}",
        "[A-Za-z .,]{0,12}",
    ]
}

fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (1_500_000_000i64..1_800_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Papers with titles drawn from a small pool so collisions happen.
fn arb_papers() -> impl Strategy<Value = Vec<Paper>> {
    proptest::collection::vec(
        (0usize..6, arb_timestamp(), proptest::collection::btree_set(0usize..4, 1..3)),
        0..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(title, published, authors)| {
                let matching: Vec<TrackedAuthor> =
                    authors.iter().map(|i| TrackedAuthor::new(format!("Author {i}"))).collect();
                Paper {
                    title: format!("Title {title}"),
                    authors: matching.iter().map(ToString::to_string).collect(),
                    summary: String::new(),
                    published: String::new(),
                    published_raw: published,
                    pdf_url: String::new(),
                    arxiv_url: String::new(),
                    queried_author: matching[0].clone(),
                    matching_authors: matching,
                }
            })
            .collect()
    })
}

fn arb_raw_results() -> impl Strategy<Value = Vec<RawResult>> {
    proptest::collection::vec(
        (
            0usize..8,
            arb_timestamp(),
            proptest::collection::vec(
                prop_oneof![Just("Jane Doe"), Just("Doe, John"), Just("Ann Lee"), Just("Bob Roe")],
                1..4,
            ),
            prop_oneof![Just("cs.CL"), Just("cs.LG"), Just("math.CO")],
        ),
        0..25,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(title, published, authors, category)| RawResult {
                title: format!("Title {title}"),
                authors: authors.into_iter().map(String::from).collect(),
                summary: "Abstract".into(),
                categories: vec![category.to_string()],
                published,
                entry_url: format!("http://arxiv.org/abs/{title}"),
                pdf_url: format!("http://arxiv.org/pdf/{title}"),
            })
            .collect()
    })
}

proptest! {
    /// Normalization ignores case and token order.
    #[test]
    fn normalize_ignores_case_and_order(first in "[A-Za-z]{1,10}", last in "[A-Za-z]{1,10}") {
        let forward = normalize(&format!("{first} {last}"));
        let backward = normalize(&format!("{}, {}", last.to_uppercase(), first));
        prop_assert_eq!(forward, backward);
    }

    /// A tracked author is matched exactly when some paper author has the same non-empty token set.
    #[test]
    fn matcher_matches_iff_token_sets_equal(
        roster in proptest::collection::vec(arb_name(), 1..6),
        paper_authors in proptest::collection::vec(arb_name(), 0..8),
    ) {
        let roster: Vec<TrackedAuthor> = roster.into_iter().map(TrackedAuthor::new).collect();
        let matched = NameMatcher::new(&roster).match_authors(&paper_authors);

        let mut seen = HashSet::new();
        for author in &roster {
            if !seen.insert(author.as_str()) {
                continue;
            }
            let tokens = normalize(author.as_str());
            let expected = !tokens.is_empty()
                && paper_authors.iter().any(|name| normalize(name) == tokens);
            prop_assert_eq!(matched.contains(author), expected, "author {}", author);
        }

        // Roster order, no repeats.
        let positions: Vec<usize> = matched
            .iter()
            .map(|m| roster.iter().position(|r| r == m).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    /// Truncation keeps a prefix and adds the ellipsis only when it cut.
    #[test]
    fn truncation_keeps_prefix(text in "\\PC{0,300}", cap in 0usize..200) {
        let out = truncate_summary(&text, cap);
        let len = text.chars().count();

        if len <= cap {
            prop_assert_eq!(out, text);
        } else {
            prop_assert_eq!(out.chars().count(), cap + 3);
            prop_assert!(out.ends_with("..."));
            let prefix: String = text.chars().take(cap).collect();
            prop_assert!(out.starts_with(&prefix));
        }
    }

    /// Dedup keeps one record per title and loses no matched author.
    #[test]
    fn dedup_keeps_one_record_per_title(mut papers in arb_papers()) {
        papers.sort_by(|a, b| b.published_raw.cmp(&a.published_raw));

        let titles: HashSet<String> = papers.iter().map(|p| p.title.clone()).collect();
        let mut dedup = Deduplicator::new(TitleMatch::Exact);
        for paper in papers.clone() {
            dedup.push(paper);
        }
        let merged = dedup.into_papers();

        prop_assert_eq!(merged.len(), titles.len());
        for record in &merged {
            let expected: HashSet<&TrackedAuthor> = papers
                .iter()
                .filter(|p| p.title == record.title)
                .flat_map(|p| &p.matching_authors)
                .collect();
            let actual: HashSet<&TrackedAuthor> = record.matching_authors.iter().collect();
            prop_assert_eq!(actual.len(), record.matching_authors.len(), "duplicate matching author");
            prop_assert_eq!(actual, expected);
        }
    }

    /// Ranking is newest first and respects the limit.
    #[test]
    fn rank_is_sorted_and_capped(papers in arb_papers(), limit in 0usize..40) {
        let total = papers.len();
        let ranked = rank(papers, limit);

        prop_assert_eq!(ranked.len(), total.min(limit));
        prop_assert!(ranked.windows(2).all(|w| w[0].published_raw >= w[1].published_raw));
    }

    /// Escaped text never opens a tag or breaks out of an attribute.
    #[test]
    fn escaped_text_has_no_markup(text in "\\PC{0,100}") {
        let escaped = escape_html(&text);
        prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
    }

    /// Roster parsing never panics on arbitrary input.
    #[test]
    fn roster_parse_never_panics(content in "\\PC{0,200}") {
        let _ = parse_roster(&content);
    }

    /// A batched run yields unique titles, newest first, within the cap, all attributed to the roster.
    #[test]
    fn batched_run_output_is_well_formed(results in arb_raw_results(), limit in 1usize..10) {
        let roster: Vec<TrackedAuthor> = ROSTER.iter().map(|n| TrackedAuthor::new(*n)).collect();
        let config = FeedConfig { output_limit: limit, ..FeedConfig::default() }
            .with_strategy(QueryStrategy::Batched);
        let search = FixedSearch(results);
        let pipeline = FeedPipeline::new(&search, config);

        let output = tokio_test::block_on(pipeline.run(&roster)).unwrap();
        let papers = output.papers;

        prop_assert!(papers.len() <= limit);
        prop_assert!(papers.windows(2).all(|w| w[0].published_raw >= w[1].published_raw));

        let titles: HashSet<&str> = papers.iter().map(|p| p.title.as_str()).collect();
        prop_assert_eq!(titles.len(), papers.len());

        for paper in &papers {
            prop_assert!(!paper.matching_authors.is_empty());
            prop_assert!(paper.matching_authors.iter().all(|a| roster.contains(a)));
            prop_assert_eq!(&paper.queried_author, &paper.matching_authors[0]);
        }
    }
}
