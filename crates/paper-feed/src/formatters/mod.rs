//! Output formatting and writing.
//!
//! - JSON feed for the page's infinite scroll
//! - HTML fragment spliced into a static page

pub mod html;
pub mod json;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{FeedError, FeedResult};

pub use html::{HtmlOptions, PageTemplate, render_fragment};
pub use json::{papers_to_json, write_papers_json};

/// Write `contents` to `path` through a temporary file in the same directory.
///
/// Readers see either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &str) -> FeedResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| FeedError::io(dir, e))?;
    file.write_all(contents.as_bytes()).map_err(|e| FeedError::io(file.path(), e))?;
    file.as_file().sync_all().map_err(|e| FeedError::io(file.path(), e))?;
    file.persist(path).map_err(|e| FeedError::io(path, e.into()))?;

    Ok(())
}
