//! folio: blog content for a personal portfolio site
//!
//! Posts are Markdown files named `YYYY-MM-DD-slug.md` with a front-matter
//! block. They are read straight from the content directory on every query
//! and exposed through [`blog::Blog`]: lookup by slug or dated path,
//! category and tag filters, related posts, and paginated listings.

pub mod blog;
pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod query;
pub mod server;

use anyhow::Result;
use std::path::Path;

use blog::{Blog, DirectorySource};
use cache::CachedSource;

/// A portfolio site rooted at a directory
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Blog post directory
    pub content_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Blog queries over this site's posts, cached when `cache: true`
    pub fn blog(&self) -> Blog {
        if self.config.cache {
            Blog::new(CachedSource::new(self.clone()))
        } else {
            Blog::new(DirectorySource::new(self.clone()))
        }
    }

    /// Create a new post
    pub fn new_post(
        &self,
        title: &str,
        date: Option<chrono::NaiveDate>,
    ) -> Result<std::path::PathBuf> {
        commands::new::create_post(self, title, date)
    }
}
