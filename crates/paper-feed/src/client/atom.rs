//! arXiv Atom feed parsing.
//!
//! Event-driven over `quick-xml`, matching on local names so the
//! `opensearch:` and `arxiv:` prefixes don't matter.

use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ClientError, ClientResult};
use crate::models::RawResult;

/// One page of search results.
#[derive(Debug, Default)]
pub struct AtomPage {
    /// `opensearch:totalResults`, if the feed reported it.
    pub total_results: Option<usize>,

    /// Entries in feed order.
    pub entries: Vec<RawResult>,
}

/// Parse an Atom response body into a page of raw results.
///
/// # Errors
///
/// Returns [`ClientError::Feed`] on malformed XML or an entry without an
/// id or a parseable `published` timestamp.
pub fn parse_feed(body: &str) -> ClientResult<AtomPage> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut page = AtomPage::default();
    let mut entry: Option<EntryBuilder> = None;
    let mut in_author = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                text.clear();
                match e.local_name().as_ref() {
                    b"entry" => entry = Some(EntryBuilder::default()),
                    b"author" => in_author = true,
                    _ => {}
                }
                if let Some(builder) = entry.as_mut() {
                    builder.element(&e);
                }
            }
            Event::Empty(e) => {
                if let Some(builder) = entry.as_mut() {
                    builder.element(&e);
                }
            }
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(e) => {
                let value = std::mem::take(&mut text);
                match e.local_name().as_ref() {
                    b"entry" => {
                        if let Some(builder) = entry.take() {
                            page.entries.push(builder.finish()?);
                        }
                    }
                    b"author" => in_author = false,
                    b"totalResults" if entry.is_none() => {
                        page.total_results = value.trim().parse().ok();
                    }
                    tag => {
                        if let Some(builder) = entry.as_mut() {
                            builder.text(tag, in_author, value);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if entry.is_some() {
        return Err(ClientError::feed("feed ended inside an entry"));
    }

    Ok(page)
}

#[derive(Debug, Default)]
struct EntryBuilder {
    id: Option<String>,
    title: Option<String>,
    summary: String,
    published: Option<String>,
    authors: Vec<String>,
    categories: Vec<String>,
    pdf_url: Option<String>,
}

impl EntryBuilder {
    fn element(&mut self, e: &BytesStart<'_>) {
        match e.local_name().as_ref() {
            b"category" => {
                if let Some(term) = attribute(e, b"term") {
                    if !term.is_empty() && !self.categories.contains(&term) {
                        self.categories.push(term);
                    }
                }
            }
            b"link" => {
                if attribute(e, b"title").as_deref() == Some("pdf") {
                    self.pdf_url = attribute(e, b"href");
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, tag: &[u8], in_author: bool, value: String) {
        match tag {
            b"id" => self.id = Some(value),
            b"title" => self.title = Some(value),
            b"summary" => self.summary = value,
            b"published" => self.published = Some(value),
            b"name" if in_author => self.authors.push(value),
            _ => {}
        }
    }

    fn finish(self) -> ClientResult<RawResult> {
        let entry_url = self.id.ok_or_else(|| ClientError::feed("entry without <id>"))?;

        let raw_published = self.published.ok_or_else(|| {
            ClientError::feed(format!("entry {entry_url} has no <published> timestamp"))
        })?;
        let published = DateTime::parse_from_rfc3339(raw_published.trim())
            .map_err(|e| {
                ClientError::feed(format!("entry {entry_url}: bad timestamp {raw_published:?}: {e}"))
            })?
            .with_timezone(&Utc);

        // arXiv always links the PDF, but derive it from the abstract URL if not.
        let pdf_url = self.pdf_url.unwrap_or_else(|| entry_url.replacen("/abs/", "/pdf/", 1));

        Ok(RawResult {
            title: collapse_whitespace(&self.title.unwrap_or_default()),
            authors: self.authors,
            summary: self.summary,
            categories: self.categories,
            published,
            entry_url,
            pdf_url,
        })
    }
}

/// arXiv hard-wraps long titles; fold each whitespace run into one space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
