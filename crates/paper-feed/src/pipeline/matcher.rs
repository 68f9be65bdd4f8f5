//! Author-name matching by normalized token sets.
//!
//! A name is reduced to the set of its lowercase tokens with periods and
//! commas removed. Two names match only when the sets are equal, so
//! "J. Smith" and "John Smith" are different people here.

use std::collections::BTreeSet;

use crate::models::TrackedAuthor;

/// Normalized form of a name.
pub type TokenSet = BTreeSet<String>;

/// Lowercase, drop `.` and `,`, split on whitespace.
#[must_use]
pub fn normalize(name: &str) -> TokenSet {
    name.to_lowercase()
        .replace(['.', ','], "")
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Matches paper author lists against a roster normalized once up front.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    roster: Vec<(TrackedAuthor, TokenSet)>,
}

impl NameMatcher {
    /// Normalize the roster. Repeated names are kept once, at their first position.
    #[must_use]
    pub fn new(roster: &[TrackedAuthor]) -> Self {
        let mut entries: Vec<(TrackedAuthor, TokenSet)> = Vec::with_capacity(roster.len());
        for author in roster {
            if entries.iter().any(|(known, _)| known == author) {
                continue;
            }
            entries.push((author.clone(), normalize(author.as_str())));
        }
        Self { roster: entries }
    }

    /// Tracked authors present among `paper_authors`, in roster order.
    ///
    /// A name that normalizes to no tokens never matches.
    #[must_use]
    pub fn match_authors<S: AsRef<str>>(&self, paper_authors: &[S]) -> Vec<TrackedAuthor> {
        let candidates: Vec<TokenSet> = paper_authors
            .iter()
            .map(|name| normalize(name.as_ref()))
            .filter(|tokens| !tokens.is_empty())
            .collect();

        self.roster
            .iter()
            .filter(|(_, tokens)| !tokens.is_empty())
            .filter(|(_, tokens)| candidates.iter().any(|candidate| candidate == tokens))
            .map(|(author, _)| author.clone())
            .collect()
    }

    /// Number of distinct tracked authors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    /// True when the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }
}

/// One-shot form of [`NameMatcher::match_authors`].
#[must_use]
pub fn match_authors<S: AsRef<str>>(
    paper_authors: &[S],
    tracked: &[TrackedAuthor],
) -> Vec<TrackedAuthor> {
    NameMatcher::new(tracked).match_authors(paper_authors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> TokenSet {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn tracked(names: &[&str]) -> Vec<TrackedAuthor> {
        names.iter().map(|n| TrackedAuthor::new(*n)).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Jane A. Doe"), tokens(&["jane", "a", "doe"]));
        assert_eq!(normalize("Doe, Jane"), tokens(&["jane", "doe"]));
        assert_eq!(normalize("  JANE\tdoe "), tokens(&["jane", "doe"]));
        assert!(normalize(" . , ").is_empty());
    }

    #[test]
    fn test_middle_initial_does_not_match() {
        let paper = ["Jane Doe", "John Smith"];
        assert!(match_authors(&paper, &tracked(&["Jane A. Doe"])).is_empty());
        assert_eq!(match_authors(&paper, &tracked(&["Jane Doe"])), tracked(&["Jane Doe"]));
    }

    #[test]
    fn test_initials_do_not_match_full_names() {
        assert!(match_authors(&["John Smith"], &tracked(&["J. Smith"])).is_empty());
    }

    #[test]
    fn test_token_order_is_ignored() {
        let matched = match_authors(&["Doe, Jane"], &tracked(&["Jane Doe"]));
        assert_eq!(matched, tracked(&["Jane Doe"]));
    }

    #[test]
    fn test_result_follows_roster_order() {
        let paper = ["John Smith", "Ann Lee", "Jane Doe"];
        let roster = tracked(&["Jane Doe", "Bob Roe", "John Smith"]);
        assert_eq!(match_authors(&paper, &roster), tracked(&["Jane Doe", "John Smith"]));
    }

    #[test]
    fn test_repeated_roster_names_match_once() {
        let roster = tracked(&["Jane Doe", "Jane Doe"]);
        let matcher = NameMatcher::new(&roster);
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.match_authors(&["Jane Doe"]), tracked(&["Jane Doe"]));
    }

    #[test]
    fn test_empty_names_never_match() {
        assert!(match_authors(&["", "."], &tracked(&["."])).is_empty());
    }
}
