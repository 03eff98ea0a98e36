//! Table of contents extraction

use lazy_static::lazy_static;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_ANCHOR: Regex = Regex::new(r"[^a-z0-9-]").unwrap();
}

/// A heading linked from the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Collect the h2 and h3 headings of a Markdown body
pub fn table_of_contents(markdown: &str) -> Vec<TocEntry> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_HEADING_ATTRIBUTES);

    let mut entries = Vec::new();
    let mut current: Option<(u8, Option<String>, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                let level = match level {
                    HeadingLevel::H2 => 2,
                    HeadingLevel::H3 => 3,
                    _ => continue,
                };
                current = Some((level, id.map(|s| s.to_string()), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, id, text)) = current.take() {
                    let text = text.trim().to_string();
                    let id = id.unwrap_or_else(|| heading_anchor(&text));
                    if !id.is_empty() && !text.is_empty() {
                        entries.push(TocEntry { id, text, level });
                    }
                }
            }
            _ => {}
        }
    }

    entries
}

/// Anchor id for a heading: lowercase, whitespace runs to `-`, then
/// anything outside `[a-z0-9-]` dropped
pub fn heading_anchor(text: &str) -> String {
    let lower = text.to_lowercase();
    let dashed = WHITESPACE.replace_all(&lower, "-");
    NON_ANCHOR.replace_all(&dashed, "").into_owned()
}
