//! Read-through post cache keyed on the content directory's signature
//!
//! The signature hashes the name, size and modification time of every post
//! file. Each query recomputes it (a metadata-only scan) and reloads the
//! posts when it differs, so answers match an uncached load.

use anyhow::{anyhow, Result};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::blog::PostSource;
use crate::config::SiteConfig;
use crate::content::loader::ContentLoader;
use crate::content::Post;
use crate::Folio;

/// Loaded posts and the signature they were loaded under
struct CacheEntry {
    signature: u64,
    posts: Arc<Vec<Post>>,
}

/// [`PostSource`] that reuses the last load while the directory is unchanged
pub struct CachedSource {
    folio: Folio,
    entry: RwLock<Option<CacheEntry>>,
}

impl CachedSource {
    pub fn new(folio: Folio) -> Self {
        Self {
            folio,
            entry: RwLock::new(None),
        }
    }

    fn cached(&self, signature: u64) -> Result<Option<Arc<Vec<Post>>>> {
        let entry = self
            .entry
            .read()
            .map_err(|_| anyhow!("post cache lock poisoned"))?;
        Ok(entry
            .as_ref()
            .filter(|e| e.signature == signature)
            .map(|e| Arc::clone(&e.posts)))
    }
}

impl PostSource for CachedSource {
    fn posts(&self) -> Result<Vec<Post>> {
        let signature = directory_signature(&self.folio.content_dir, &self.folio.config)?;

        if let Some(posts) = self.cached(signature)? {
            tracing::debug!("Post cache hit ({:016x})", signature);
            return Ok(posts.as_ref().clone());
        }

        tracing::debug!("Post cache miss ({:016x}), reloading", signature);
        let posts = Arc::new(ContentLoader::new(&self.folio).load_posts()?);

        let mut entry = self
            .entry
            .write()
            .map_err(|_| anyhow!("post cache lock poisoned"))?;
        *entry = Some(CacheEntry {
            signature,
            posts: Arc::clone(&posts),
        });

        Ok(posts.as_ref().clone())
    }
}

/// Get file modification time as nanoseconds since the unix epoch
pub fn get_mtime(path: &Path) -> Result<u128> {
    let metadata = fs::metadata(path)?;
    let mtime = metadata.modified()?;
    Ok(mtime
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos())
}

/// Hash the name, size and mtime of every post file in `dir`.
/// A missing directory has signature 0.
pub fn directory_signature(dir: &Path, config: &SiteConfig) -> Result<u64> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut hasher = DefaultHasher::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_post = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| config.is_content_extension(e))
            .unwrap_or(false);
        if !path.is_file() || !is_post {
            continue;
        }

        entry.file_name().hash(&mut hasher);
        fs::metadata(path)?.len().hash(&mut hasher);
        get_mtime(path)?.hash(&mut hasher);
    }

    Ok(hasher.finish())
}
