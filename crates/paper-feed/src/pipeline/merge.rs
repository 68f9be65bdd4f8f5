//! Title-keyed deduplication.
//!
//! Papers must be pushed newest first: the first paper seen for a title
//! becomes the canonical record and later ones only contribute their
//! matched authors.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::config::TitleMatch;
use crate::models::Paper;

/// What happened to a pushed paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New title; the paper became a canonical record.
    Inserted,
    /// Known title; `added` new matching authors were appended.
    Merged {
        /// Authors appended to the canonical record
        added: usize,
    },
}

/// Key used to compare titles under the given mode.
#[must_use]
pub fn title_key(title: &str, mode: TitleMatch) -> Cow<'_, str> {
    match mode {
        TitleMatch::Exact => Cow::Borrowed(title),
        TitleMatch::Normalized => {
            Cow::Owned(title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
        }
    }
}

/// Accumulates canonical papers for one run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    title_match: TitleMatch,
    index: HashMap<String, usize>,
    papers: Vec<Paper>,
}

impl Deduplicator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new(title_match: TitleMatch) -> Self {
        Self { title_match, index: HashMap::new(), papers: Vec::new() }
    }

    /// Insert a paper or merge it into the record with the same title.
    pub fn push(&mut self, paper: Paper) -> MergeOutcome {
        let key = title_key(&paper.title, self.title_match);

        if let Some(&idx) = self.index.get(key.as_ref()) {
            let added = self.papers[idx].absorb_matches(&paper.matching_authors);
            return MergeOutcome::Merged { added };
        }

        let key = key.into_owned();
        self.index.insert(key, self.papers.len());
        self.papers.push(paper);
        MergeOutcome::Inserted
    }

    /// Number of canonical records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// True when nothing has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Canonical records in insertion order.
    #[must_use]
    pub fn into_papers(self) -> Vec<Paper> {
        self.papers
    }
}
