//! Post model

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::reading::{derive_excerpt, ReadingTime};
use super::FrontMatter;

lazy_static! {
    static ref DATE_PREFIX: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-").unwrap();
}

/// Characters escaped in a permalink path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// URL identifier, the file name without date prefix and extension
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Post categories, as authored
    pub categories: Vec<String>,

    /// Post tags, as authored
    pub tags: Vec<String>,

    pub meta_description: String,
    pub meta_keywords: String,

    /// Authored excerpt, or the first paragraph of the body
    pub excerpt: String,

    /// Raw markdown content
    pub content: String,

    /// e.g. "5 min read"
    pub reading_time: String,

    /// Date parts of the file name, backing `/YYYY/MM/DD/slug` URLs
    pub year: String,
    pub month: String,
    pub day: String,

    /// Source file name
    pub source: String,

    /// Custom front-matter fields
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// The pieces of a `YYYY-MM-DD-slug.ext` file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    pub slug: String,
    pub year: String,
    pub month: String,
    pub day: String,
    /// Whether the name carried a date prefix
    pub dated: bool,
}

impl FileName {
    /// Split a file name. Without a date prefix the parts fall back to the
    /// current year and `01`/`01`.
    pub fn parse(file_name: &str) -> Self {
        let stem = match file_name.rfind('.') {
            Some(pos) if pos > 0 => &file_name[..pos],
            _ => file_name,
        };

        match DATE_PREFIX.captures(stem) {
            Some(caps) => Self {
                slug: stem[caps[0].len()..].to_string(),
                year: caps[1].to_string(),
                month: caps[2].to_string(),
                day: caps[3].to_string(),
                dated: true,
            },
            None => Self {
                slug: stem.to_string(),
                year: Local::now().year().to_string(),
                month: "01".to_string(),
                day: "01".to_string(),
                dated: false,
            },
        }
    }

    /// The calendar date spelled by the parts, if it is a real one
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            self.year.parse().ok()?,
            self.month.parse().ok()?,
            self.day.parse().ok()?,
        )
    }
}

impl Post {
    /// Build a post from its file name and raw file text
    pub fn parse(file_name: &str, raw: &str, words_per_minute: usize) -> Result<Self> {
        let raw = raw.replace("\r\n", "\n");
        let (fm, body) = FrontMatter::parse(&raw)?;
        let name = FileName::parse(file_name);

        let date = match fm.parse_date()? {
            Some(date) => date,
            None => name.date().unwrap_or_else(|| {
                tracing::warn!(
                    "No usable date for {}, using today's date",
                    file_name
                );
                Local::now().date_naive()
            }),
        };

        let categories = fm.categories.map(|t| t.into_vec()).unwrap_or_default();
        let tags = fm.tags.map(|t| t.into_vec()).unwrap_or_default();

        let excerpt = fm
            .excerpt
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| derive_excerpt(body));

        let meta_description = fm
            .meta_description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| excerpt.clone());
        let meta_keywords = fm
            .meta_keywords
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| categories.join(", "));

        let reading_time = ReadingTime::estimate(body, words_per_minute).text;

        Ok(Self {
            slug: name.slug,
            title: fm
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            date,
            categories,
            tags,
            meta_description,
            meta_keywords,
            excerpt,
            content: body.to_string(),
            reading_time,
            year: name.year,
            month: name.month,
            day: name.day,
            source: file_name.to_string(),
            extra: fm.extra,
        })
    }

    /// The `YYYY/MM/DD/slug` lookup key
    pub fn date_path(&self) -> String {
        format!("{}/{}/{}/{}", self.year, self.month, self.day, self.slug)
    }

    /// Dated permalink under `blog_root`, e.g. `/blog/2021/01/01/post-a/`
    pub fn permalink(&self, blog_root: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}/",
            blog_root.trim_end_matches('/'),
            self.year,
            self.month,
            self.day,
            utf8_percent_encode(&self.slug, SEGMENT)
        )
    }

    /// Whether any category equals `category`, ignoring case
    pub fn has_category(&self, category: &str) -> bool {
        contains_ignore_case(&self.categories, category)
    }

    /// Whether any tag equals `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        contains_ignore_case(&self.tags, tag)
    }

    /// Get the newer neighbour in a newest-first list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        pos.checked_sub(1).map(|i| &posts[i])
    }

    /// Get the older neighbour in a newest-first list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}

pub(crate) fn contains_ignore_case(terms: &[String], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    terms.iter().any(|t| t.to_lowercase() == needle)
}
