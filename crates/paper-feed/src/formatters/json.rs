//! JSON feed output.

use std::path::Path;

use crate::error::FeedResult;
use crate::models::Paper;

/// Serialize papers as a pretty-printed JSON array.
///
/// `published_raw` is never part of the output.
pub fn papers_to_json(papers: &[Paper]) -> FeedResult<String> {
    Ok(serde_json::to_string_pretty(papers)?)
}

/// Serialize papers and write them atomically to `path`.
pub fn write_papers_json(path: &Path, papers: &[Paper]) -> FeedResult<()> {
    let json = papers_to_json(papers)?;
    super::write_atomic(path, &json)
}
