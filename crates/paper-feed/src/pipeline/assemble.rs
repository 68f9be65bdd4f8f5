//! Building feed papers from raw results.

use chrono::{DateTime, Utc};

use crate::models::{Paper, RawResult, TrackedAuthor};

/// Appended to a summary that was cut.
pub const ELLIPSIS: &str = "...";

/// Display format for `Paper::published`.
pub const PUBLISHED_FORMAT: &str = "%b %d";

/// Cut `text` to at most `cap` characters, appending [`ELLIPSIS`] only if something was cut.
///
/// Characters are Unicode scalar values; the cut ignores word boundaries.
#[must_use]
pub fn truncate_summary(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((end, _)) => format!("{}{ELLIPSIS}", &text[..end]),
        None => text.to_string(),
    }
}

/// Short date without the year, e.g. "Mar 05".
#[must_use]
pub fn format_published(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(PUBLISHED_FORMAT).to_string()
}

/// Build a paper from a raw result and the tracked authors matched to it.
///
/// Returns `None` when nothing matched; such results are dropped.
#[must_use]
pub fn assemble(raw: RawResult, matched: Vec<TrackedAuthor>, max_abstract_len: usize) -> Option<Paper> {
    let queried_author = matched.first()?.clone();

    Some(Paper {
        summary: truncate_summary(&raw.summary, max_abstract_len),
        published: format_published(&raw.published),
        published_raw: raw.published,
        title: raw.title,
        authors: raw.authors,
        pdf_url: raw.pdf_url,
        arxiv_url: raw.entry_url,
        queried_author,
        matching_authors: matched,
    })
}
