//! Ordering and truncation of the final feed.

use crate::models::Paper;

/// Sort newest first. Stable, so equal timestamps keep their input order.
pub fn sort_by_recency(papers: &mut [Paper]) {
    papers.sort_by(|a, b| b.published_raw.cmp(&a.published_raw));
}

/// Sort newest first and keep at most `limit` papers.
#[must_use]
pub fn rank(mut papers: Vec<Paper>, limit: usize) -> Vec<Paper> {
    sort_by_recency(&mut papers);
    papers.truncate(limit);
    papers
}
