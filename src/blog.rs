//! The query surface used by pages and the JSON API.
//!
//! Every call asks its [`PostSource`] for the collection again, so results
//! always follow the content directory without any invalidation step.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::content::loader::ContentLoader;
use crate::content::Post;
use crate::query::{self, Pagination, PostFilter};
use crate::Folio;

/// Something that produces the full, newest-first post collection
pub trait PostSource: Send + Sync {
    fn posts(&self) -> Result<Vec<Post>>;
}

/// Re-scans the content directory on every call
pub struct DirectorySource {
    folio: Folio,
}

impl DirectorySource {
    pub fn new(folio: Folio) -> Self {
        Self { folio }
    }
}

impl PostSource for DirectorySource {
    fn posts(&self) -> Result<Vec<Post>> {
        ContentLoader::new(&self.folio).load_posts()
    }
}

/// A related post with its score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPost {
    pub post: Post,
    pub score: usize,
}

/// One page of the blog listing
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

/// Read-only blog queries
#[derive(Clone)]
pub struct Blog {
    source: Arc<dyn PostSource>,
}

impl Blog {
    pub fn new(source: impl PostSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// All posts, newest first
    pub fn all_posts(&self) -> Result<Vec<Post>> {
        self.source.posts()
    }

    /// Resolve a slug or a `year/month/day/slug` path
    pub fn get(&self, key: &str) -> Result<Option<Post>> {
        let posts = self.source.posts()?;
        Ok(query::find_by_key(&posts, key).cloned())
    }

    pub fn by_category(&self, category: &str) -> Result<Vec<Post>> {
        let posts = self.source.posts()?;
        Ok(query::by_category(&posts, category)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn by_tag(&self, tag: &str) -> Result<Vec<Post>> {
        let posts = self.source.posts()?;
        Ok(query::by_tag(&posts, tag).into_iter().cloned().collect())
    }

    /// Up to `max` posts related to `post`, best first
    pub fn related(&self, post: &Post, max: usize) -> Result<Vec<Post>> {
        Ok(self
            .related_scored(post, max)?
            .into_iter()
            .map(|s| s.post)
            .collect())
    }

    /// Like [`Blog::related`], keeping the scores
    pub fn related_scored(&self, post: &Post, max: usize) -> Result<Vec<ScoredPost>> {
        let posts = self.source.posts()?;
        Ok(query::related(&posts, post, max)
            .into_iter()
            .map(|r| ScoredPost {
                post: r.post.clone(),
                score: r.score,
            })
            .collect())
    }

    pub fn categories(&self) -> Result<Vec<String>> {
        Ok(query::all_categories(&self.source.posts()?))
    }

    pub fn tags(&self) -> Result<Vec<String>> {
        Ok(query::all_tags(&self.source.posts()?))
    }

    /// Filtered listing sliced by the filter's offset and limit
    pub fn filtered(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        let posts = self.source.posts()?;
        Ok(query::filtered(&posts, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Page `page` (1-based) of the filtered listing
    pub fn page(&self, filter: &PostFilter, page: usize, per_page: usize) -> Result<PostPage> {
        let posts = self.source.posts()?;
        let (window, pagination) = query::paginate(&posts, filter, page, per_page)?;
        Ok(PostPage {
            posts: window.into_iter().cloned().collect(),
            pagination,
        })
    }

    /// The newest `count` posts
    pub fn recent(&self, count: usize) -> Result<Vec<Post>> {
        let posts = self.source.posts()?;
        Ok(query::recent(&posts, count).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;
    use std::fs;
    use tempfile::TempDir;

    fn site(files: &[(&str, &str)]) -> (TempDir, Blog) {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        fs::create_dir_all(&folio.content_dir).unwrap();
        for (name, content) in files {
            fs::write(folio.content_dir.join(name), content).unwrap();
        }
        let blog = Blog::new(DirectorySource::new(folio));
        (dir, blog)
    }

    fn scenario() -> (TempDir, Blog) {
        site(&[
            (
                "2021-01-01-post-a.md",
                "---\ntitle: Post A\ncategories: [rails]\ntags: [ruby]\n---\nA body",
            ),
            (
                "2021-03-01-post-b.md",
                "---\ntitle: Post B\ncategories: [rails]\ntags: [python]\n---\nB body",
            ),
        ])
    }

    #[test]
    fn test_scenario() {
        let (_dir, blog) = scenario();
        let b = blog.get("post-b").unwrap().unwrap();

        let related = blog.related_scored(&b, 4).unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].post.slug, "post-a");
        assert_eq!(related[0].score, 2);

        let python: Vec<_> = blog
            .by_tag("python")
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(python, vec!["post-b"]);

        let a = blog.get("2021/01/01/post-a").unwrap().unwrap();
        assert_eq!(a.title, "Post A");
    }

    #[test]
    fn test_round_trip_lookup() {
        let (_dir, blog) = scenario();
        for post in blog.all_posts().unwrap() {
            assert_eq!(blog.get(&post.slug).unwrap().as_ref(), Some(&post));
            assert_eq!(blog.get(&post.date_path()).unwrap().as_ref(), Some(&post));
        }
        assert!(blog.get("definitely-absent-key").unwrap().is_none());
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(DirectorySource::new(Folio::new(dir.path()).unwrap()));
        assert!(blog.all_posts().unwrap().is_empty());
        assert!(blog.categories().unwrap().is_empty());
        assert!(blog.get("anything").unwrap().is_none());
        assert!(blog.filtered(&PostFilter::default().offset(3)).unwrap().is_empty());
    }

    #[test]
    fn test_first_two_of_five() {
        let files: Vec<(String, String)> = (1..=5)
            .map(|i| (format!("2022-0{}-01-post-{}.md", i, i), format!("post {}", i)))
            .collect();
        let refs: Vec<(&str, &str)> = files
            .iter()
            .map(|(n, c)| (n.as_str(), c.as_str()))
            .collect();
        let (_dir, blog) = site(&refs);

        let all = blog.all_posts().unwrap();
        let firsts = blog.filtered(&PostFilter::default().limit(2).offset(0)).unwrap();
        assert_eq!(firsts, all[..2].to_vec());
        assert_eq!(firsts[0].slug, "post-5");
    }

    #[test]
    fn test_page_and_aggregates() {
        let (_dir, blog) = scenario();
        let page = blog.page(&PostFilter::default(), 1, 1).unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].slug, "post-b");
        assert_eq!(page.pagination.total_pages, 2);

        let err = blog.page(&PostFilter::default(), 0, 1).unwrap_err();
        assert_eq!(err.downcast_ref::<QueryError>(), Some(&QueryError::ZeroPage));

        assert_eq!(blog.categories().unwrap(), vec!["rails"]);
        assert_eq!(blog.tags().unwrap(), vec!["python", "ruby"]);
        assert_eq!(blog.recent(1).unwrap()[0].slug, "post-b");
        assert!(blog.by_category("RAILS").unwrap().len() == 2);
    }
}
