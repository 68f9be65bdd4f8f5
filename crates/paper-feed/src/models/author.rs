//! Tracked authors from the roster.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A name on the roster whose publications are being monitored.
///
/// Roster order is meaningful: it decides the order of matched authors
/// on a paper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedAuthor(String);

impl TrackedAuthor {
    /// Wrap a roster name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as it appears on the roster.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackedAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrackedAuthor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackedAuthor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TrackedAuthor {
    fn from(name: String) -> Self {
        Self(name)
    }
}
