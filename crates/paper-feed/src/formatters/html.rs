//! HTML page output.
//!
//! The static page carries named slots delimited by comment markers:
//!
//! ```html
//! <ul>
//!   <!-- paper-feed:papers:begin -->
//!   ...replaced on every run...
//!   <!-- paper-feed:papers:end -->
//! </ul>
//! ```
//!
//! Markers survive substitution so the next run finds them again.

use std::borrow::Cow;

use crate::config::defaults;
use crate::error::{FeedError, FeedResult};
use crate::models::Paper;

/// Slot that receives the rendered paper list.
pub const PAPERS_SLOT: &str = "papers";

/// Limits for the rendered fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Papers rendered, from the front of the feed.
    pub max_papers: usize,
    /// Authors listed per paper before "et al.".
    pub max_authors: usize,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self { max_papers: defaults::HTML_PAPERS, max_authors: defaults::HTML_MAX_AUTHORS }
    }
}

/// Escape text for use in element content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Comma-joined author list with matched tracked authors underlined.
#[must_use]
pub fn format_authors(paper: &Paper, max_authors: usize) -> String {
    let mut parts: Vec<String> = paper
        .authors
        .iter()
        .take(max_authors)
        .map(|name| {
            let escaped = escape_html(name);
            if paper.is_matching_author(name) {
                format!("<u>{escaped}</u>")
            } else {
                escaped.into_owned()
            }
        })
        .collect();

    if paper.authors.len() > max_authors {
        parts.push("et al.".to_string());
    }

    parts.join(", ")
}

/// Render one paper as a list item.
#[must_use]
pub fn render_paper(paper: &Paper, max_authors: usize) -> String {
    let url = escape_html(&paper.arxiv_url);
    let published = escape_html(&paper.published);
    let title = escape_html(&paper.title);
    let authors = format_authors(paper, max_authors);

    format!(
        r#"<li> <a class="post-item-link" href="{url}" target="_blank"> <time
      class="desktop-time">{published}</time>
    <div class="post-info">
      <div class="post-title">{title}</div>
      <div class="author-date"> {authors}<span class="mobile-date-separator"> <span
            class="separator">·</span> {published}</span> </div>
    </div>
  </a> </li>"#
    )
}

/// Render the first `options.max_papers` papers as consecutive list items.
#[must_use]
pub fn render_fragment(papers: &[Paper], options: &HtmlOptions) -> String {
    papers
        .iter()
        .take(options.max_papers)
        .map(|paper| render_paper(paper, options.max_authors))
        .collect::<Vec<_>>()
        .join("\n")
}

fn begin_marker(slot: &str) -> String {
    format!("<!-- paper-feed:{slot}:begin -->")
}

fn end_marker(slot: &str) -> String {
    format!("<!-- paper-feed:{slot}:end -->")
}

/// Byte range of a slot's current content (between its two markers).
fn slot_range(page: &str, slot: &str) -> FeedResult<std::ops::Range<usize>> {
    let begin = begin_marker(slot);
    let end = end_marker(slot);

    let begins = page.matches(begin.as_str()).count();
    let ends = page.matches(end.as_str()).count();
    if begins != 1 || ends != 1 {
        return Err(FeedError::template(format!(
            "slot '{slot}' needs exactly one begin and one end marker, found {begins} and {ends}"
        )));
    }

    // Counts are 1, so both finds succeed.
    let content_start = page.find(begin.as_str()).map_or(0, |i| i + begin.len());
    let content_end = page.find(end.as_str()).unwrap_or(0);
    if content_end < content_start {
        return Err(FeedError::template(format!("slot '{slot}' ends before it begins")));
    }

    Ok(content_start..content_end)
}

/// A static page with validated insertion slots.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    source: String,
    slots: Vec<String>,
}

impl PageTemplate {
    /// Validate that `source` contains every slot in `slots` exactly once.
    ///
    /// # Errors
    ///
    /// [`FeedError::Template`] if a slot is missing, repeated, or inverted.
    pub fn parse(source: impl Into<String>, slots: &[&str]) -> FeedResult<Self> {
        let source = source.into();
        for slot in slots {
            slot_range(&source, slot)?;
        }
        Ok(Self { source, slots: slots.iter().map(|s| (*s).to_string()).collect() })
    }

    /// Validate a page with the single papers slot.
    pub fn papers_page(source: impl Into<String>) -> FeedResult<Self> {
        Self::parse(source, &[PAPERS_SLOT])
    }

    /// Replace the content of the named slots and return the new page.
    ///
    /// Every declared slot must be filled. The result is validated again
    /// before it is returned.
    ///
    /// # Errors
    ///
    /// [`FeedError::Template`] for an unknown or unfilled slot, content that
    /// contains slot markers, or a page that fails validation afterwards.
    pub fn render(&self, fills: &[(&str, &str)]) -> FeedResult<String> {
        for (slot, _) in fills {
            if !self.slots.iter().any(|s| s == slot) {
                return Err(FeedError::template(format!("unknown slot '{slot}'")));
            }
        }
        for slot in &self.slots {
            if !fills.iter().any(|(name, _)| name == slot) {
                return Err(FeedError::template(format!("slot '{slot}' was not filled")));
            }
        }
        for (_, content) in fills {
            if content.contains("<!-- paper-feed:") {
                return Err(FeedError::template("slot content contains a slot marker"));
            }
        }

        let mut page = self.source.clone();
        for (slot, content) in fills {
            let range = slot_range(&page, slot)?;
            page.replace_range(range, &format!("\n{content}\n"));
        }

        for slot in &self.slots {
            slot_range(&page, slot)?;
        }

        Ok(page)
    }

    /// Fill only the papers slot.
    pub fn render_papers(&self, fragment: &str) -> FeedResult<String> {
        self.render(&[(PAPERS_SLOT, fragment)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackedAuthor;

    const PAGE: &str = "<ul>\n<!-- paper-feed:papers:begin -->\nstale\n<!-- paper-feed:papers:end -->\n</ul>";

    fn paper(authors: &[&str], matching: &[&str]) -> Paper {
        let matching: Vec<TrackedAuthor> = matching.iter().map(|n| TrackedAuthor::new(*n)).collect();
        Paper {
            title: "Foo <bar> & baz".into(),
            authors: authors.iter().map(|a| (*a).to_string()).collect(),
            summary: String::new(),
            published: "Mar 05".into(),
            published_raw: "2024-03-05T00:00:00Z".parse().unwrap(),
            pdf_url: String::new(),
            arxiv_url: "http://arxiv.org/abs/2403.00001v1".into(),
            queried_author: matching[0].clone(),
            matching_authors: matching,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_format_authors_underlines_matches() {
        let p = paper(&["Jane Doe", "John Smith"], &["John Smith"]);
        assert_eq!(format_authors(&p, 50), "Jane Doe, <u>John Smith</u>");
    }

    #[test]
    fn test_format_authors_caps_list() {
        let p = paper(&["A", "B", "C"], &["A"]);
        assert_eq!(format_authors(&p, 2), "<u>A</u>, B, et al.");
        assert_eq!(format_authors(&p, 3), "<u>A</u>, B, C");
    }

    #[test]
    fn test_render_paper_escapes_title() {
        let html = render_paper(&paper(&["A"], &["A"]), 50);
        assert!(html.contains(r#"href="http://arxiv.org/abs/2403.00001v1""#));
        assert!(html.contains("Foo &lt;bar&gt; &amp; baz"));
        assert!(html.contains(r#"<time
      class="desktop-time">Mar 05</time>"#));
    }

    #[test]
    fn test_render_fragment_limits_papers() {
        let papers = vec![paper(&["A"], &["A"]); 5];
        let fragment = render_fragment(&papers, &HtmlOptions { max_papers: 3, max_authors: 50 });
        assert_eq!(fragment.matches("<li>").count(), 3);
    }

    #[test]
    fn test_render_replaces_slot_and_keeps_markers() {
        let template = PageTemplate::papers_page(PAGE).unwrap();
        let page = template.render_papers("<li>new</li>").unwrap();

        assert_eq!(
            page,
            "<ul>\n<!-- paper-feed:papers:begin -->\n<li>new</li>\n<!-- paper-feed:papers:end -->\n</ul>"
        );
        // Rendering is repeatable on its own output.
        let again = PageTemplate::papers_page(page.clone()).unwrap().render_papers("<li>new</li>").unwrap();
        assert_eq!(again, page);
    }

    #[test]
    fn test_missing_slot_is_rejected() {
        let err = PageTemplate::papers_page("<ul></ul>").unwrap_err();
        assert!(matches!(err, FeedError::Template(_)));
    }

    #[test]
    fn test_duplicate_marker_is_rejected() {
        let page = format!("{PAGE}\n<!-- paper-feed:papers:begin -->");
        assert!(PageTemplate::papers_page(page).is_err());
    }

    #[test]
    fn test_inverted_markers_are_rejected() {
        let page = "<!-- paper-feed:papers:end --><!-- paper-feed:papers:begin -->";
        let err = PageTemplate::papers_page(page).unwrap_err();
        assert!(err.to_string().contains("ends before it begins"));
    }

    #[test]
    fn test_content_with_marker_is_rejected() {
        let template = PageTemplate::papers_page(PAGE).unwrap();
        assert!(template.render_papers("<!-- paper-feed:papers:end -->").is_err());
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        let template = PageTemplate::papers_page(PAGE).unwrap();
        assert!(template.render(&[("papers", "x"), ("sidebar", "y")]).is_err());
    }
}
