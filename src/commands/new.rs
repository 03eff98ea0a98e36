//! Create a new post

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

const DEFAULT_SCAFFOLD: &str = r#"---
title: {{ title }}
date: {{ date }}
categories: []
tags: []
---
"#;

/// Create `YYYY-MM-DD-<slug>.md` in the content directory
pub fn create_post(folio: &Folio, title: &str, date: Option<NaiveDate>) -> Result<PathBuf> {
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&folio.content_dir)?;

    let filename = format!("{}-{}.md", date.format("%Y-%m-%d"), slug);
    let file_path = folio.content_dir.join(filename);

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // Load scaffold template
    let scaffold_path = folio.base_dir.join("scaffolds").join("post.md");
    let scaffold_content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    // A JSON string is also a valid YAML scalar, which keeps quotes and
    // colons in the title intact
    let quoted_title = serde_json::to_string(title)?;
    let content = scaffold_content
        .replace("{{ title }}", &quoted_title)
        .replace("{{ date }}", &date.format("%Y-%m-%d").to_string());

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
