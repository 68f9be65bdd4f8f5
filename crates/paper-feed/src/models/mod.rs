//! Data models for roster entries, search results and feed papers.

mod author;
mod paper;
mod query;

pub use author::TrackedAuthor;
pub use paper::{Paper, RawResult};
pub use query::{SearchQuery, SortCriterion, SortOrder};
