//! Front-matter parsing

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category or tag list as authored: either a YAML/TOML/JSON list or a
/// single whitespace-separated string (`categories: rails ruby`).
/// Numbers and booleans are read as their text (`tags: [rust, 2024]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Terms {
    List(Vec<serde_yaml::Value>),
    Spaced(serde_yaml::Value),
}

impl Terms {
    /// Flatten into the ordered term list stored on a post.
    /// Nulls and nested lists or maps are dropped.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Terms::List(items) => items.iter().filter_map(scalar_text).collect(),
            Terms::Spaced(value) => scalar_text(&value)
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub categories: Option<Terms>,
    pub tags: Option<Terms>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub excerpt: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with("+++") {
            return Self::parse_toml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str)> {
        let Some((block, remaining)) = split_block(content, "---") else {
            // No closing ---, the whole file is body
            return Ok((FrontMatter::default(), content));
        };

        if block.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // A leading `---` may just be a Markdown rule; only treat the block
        // as metadata when some line has a `key: value` shape.
        if !block.lines().any(looks_like_yaml_key) {
            return Ok((FrontMatter::default(), content));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(block)
            .map_err(|e| anyhow!("Failed to parse YAML front-matter: {}", e))?;
        Ok((fm, remaining))
    }

    fn parse_toml(content: &str) -> Result<(Self, &str)> {
        let Some((block, remaining)) = split_block(content, "+++") else {
            bail!("Unterminated TOML front-matter");
        };

        let mut table: toml::Table = block
            .parse()
            .map_err(|e| anyhow!("Failed to parse TOML front-matter: {}", e))?;

        // Bare TOML dates become strings so they read like the YAML ones
        for (_, value) in table.iter_mut() {
            let text = match value {
                toml::Value::Datetime(dt) => dt.to_string(),
                _ => continue,
            };
            *value = toml::Value::String(text);
        }

        let fm = toml::Value::Table(table)
            .try_into::<FrontMatter>()
            .map_err(|e| anyhow!("Failed to parse TOML front-matter: {}", e))?;
        Ok((fm, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        // JSON front-matter ends with ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            if let Some(end_pos) = rest.find(";;;") {
                let json_content = &rest[..end_pos];
                let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);

                let fm: FrontMatter = serde_json::from_str(json_content)
                    .map_err(|e| anyhow!("Failed to parse JSON front-matter: {}", e))?;

                return Ok((fm, remaining));
            }
        }

        if content.starts_with('{') {
            // Find matching closing brace
            let mut depth = 0;
            let mut end_pos = 0;
            for (i, c) in content.char_indices() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            end_pos = i + 1;
                            break;
                        }
                    }
                    _ => {}
                }
            }

            if end_pos > 0 {
                let json_content = &content[..end_pos];
                let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);

                let fm: FrontMatter = serde_json::from_str(json_content)
                    .map_err(|e| anyhow!("Failed to parse JSON front-matter: {}", e))?;

                return Ok((fm, remaining));
            }
        }

        Err(anyhow!("Invalid JSON front-matter"))
    }

    /// Parse the `date` field.
    ///
    /// `Ok(None)` when the field is absent, an error when it is present but
    /// not a recognisable date.
    pub fn parse_date(&self) -> Result<Option<NaiveDate>> {
        match self.date.as_deref() {
            None => Ok(None),
            Some(s) => parse_date_string(s)
                .map(Some)
                .ok_or_else(|| anyhow!("Invalid date in front-matter: {:?}", s)),
        }
    }
}

/// Split `delim\n<block>\n<delim>` off the start of `content`.
fn split_block<'a>(content: &'a str, delim: &str) -> Option<(&'a str, &'a str)> {
    let rest = content[delim.len()..].trim_start_matches(['\n', '\r']);
    let closing = format!("\n{}", delim);

    if let Some(after) = rest.strip_prefix(delim) {
        // empty block
        return Some(("", after.trim_start_matches(['\n', '\r'])));
    }

    let end_pos = rest.find(&closing)?;
    let block = &rest[..end_pos];
    let remaining = rest[end_pos + closing.len()..].trim_start_matches(['\n', '\r']);
    Some((block, remaining))
}

fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let Some(colon_pos) = trimmed.find(':') else {
        return false;
    };
    let key = &trimmed[..colon_pos];
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");
    let after_colon = &trimmed[colon_pos + 1..];
    is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
}

/// Parse a date string in various formats, keeping only the calendar date
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(d);
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // Jekyll timestamps, e.g. `2015-03-01 12:00:00 -0500`; the date is the
    // one written, not shifted to UTC
    let offset_formats = [
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S%.f %z",
        "%Y-%m-%d %H:%M:%S%z",
        "%Y-%m-%d %H:%M %z",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }

    None
}
