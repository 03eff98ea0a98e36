//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Content
    /// Directory holding the blog posts, relative to the site root
    pub content_dir: String,
    /// File extensions treated as posts
    pub extensions: Vec<String>,
    /// Reading speed used for the reading time estimate
    pub words_per_minute: usize,

    // URL
    /// Prefix of the dated permalinks (`/blog/YYYY/MM/DD/slug/`)
    pub blog_root: String,

    // Listing
    pub per_page: usize,
    pub recent_posts: usize,
    pub related_posts: usize,

    /// Reuse the loaded posts while the content directory is unchanged
    pub cache: bool,

    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            url: "http://example.com".to_string(),

            content_dir: "content/blog".to_string(),
            extensions: vec!["md".to_string(), "mdx".to_string()],
            words_per_minute: 200,

            blog_root: "/blog".to_string(),

            per_page: 10,
            recent_posts: 3,
            related_posts: 4,

            cache: false,

            server: ServerConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Whether a file extension marks a post
    pub fn is_content_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Development server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}
