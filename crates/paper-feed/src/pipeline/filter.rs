//! Category filter.

use std::collections::BTreeSet;

use crate::models::RawResult;

/// Keep a result iff one of its categories is in the allow-list.
#[must_use]
pub fn is_allowed(raw: &RawResult, allowed: &BTreeSet<String>) -> bool {
    raw.has_any_category(allowed)
}
