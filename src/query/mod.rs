//! Queries over a loaded, newest-first post collection
//!
//! Everything here is a pure function of the post slice it is given;
//! [`crate::blog::Blog`] feeds them a fresh load on every call.

mod pagination;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use thiserror::Error;

use crate::content::{contains_ignore_case, Post};

pub use pagination::Pagination;

/// Invalid listing parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("page numbers start at 1")]
    ZeroPage,
    #[error("posts per page must be at least 1")]
    ZeroPerPage,
}

/// Category/tag filter with offset/limit slicing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub offset: Option<usize>,
    /// Unbounded when absent
    pub limit: Option<NonZeroUsize>,
}

impl PostFilter {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = NonZeroUsize::new(limit);
        self
    }

    /// Whether a post passes the category and tag parts of the filter.
    /// Empty strings match everything.
    pub fn matches(&self, post: &Post) -> bool {
        let category_ok = match self.category.as_deref() {
            Some(c) if !c.is_empty() => post.has_category(c),
            _ => true,
        };
        let tag_ok = match self.tag.as_deref() {
            Some(t) if !t.is_empty() => post.has_tag(t),
            _ => true,
        };
        category_ok && tag_ok
    }
}

/// A related post and its similarity score
#[derive(Debug, Clone, Serialize)]
pub struct Related<'a> {
    pub post: &'a Post,
    pub score: usize,
}

/// Look a post up by slug, then by a `year/month/day/slug` path
pub fn find_by_key<'a>(posts: &'a [Post], key: &str) -> Option<&'a Post> {
    if let Some(post) = posts.iter().find(|p| p.slug == key) {
        return Some(post);
    }

    let parts: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        [year, month, day, slug] => posts.iter().find(|p| {
            p.year == *year && p.month == *month && p.day == *day && p.slug == *slug
        }),
        _ => None,
    }
}

/// Posts with a category equal to `category`, ignoring case
pub fn by_category<'a>(posts: &'a [Post], category: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.has_category(category)).collect()
}

/// Posts with a tag equal to `tag`, ignoring case
pub fn by_tag<'a>(posts: &'a [Post], tag: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.has_tag(tag)).collect()
}

/// Similarity of `candidate` to `post`: two points per shared category,
/// one per shared tag
pub fn related_score(post: &Post, candidate: &Post) -> usize {
    let categories = candidate
        .categories
        .iter()
        .filter(|c| contains_ignore_case(&post.categories, c))
        .count();
    let tags = candidate
        .tags
        .iter()
        .filter(|t| contains_ignore_case(&post.tags, t))
        .count();
    categories * 2 + tags
}

/// Up to `max` other posts sharing categories or tags with `post`,
/// best first. Equal scores keep collection order.
pub fn related<'a>(posts: &'a [Post], post: &Post, max: usize) -> Vec<Related<'a>> {
    let mut scored: Vec<Related<'a>> = posts
        .iter()
        .filter(|p| p.slug != post.slug)
        .map(|p| Related {
            post: p,
            score: related_score(post, p),
        })
        .filter(|r| r.score > 0)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(max);
    scored
}

/// Every distinct category, as authored, sorted
pub fn all_categories(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.categories.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every distinct tag, as authored, sorted
pub fn all_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Apply the category and tag filters, then slice `[offset, offset + limit)`
pub fn filtered<'a>(posts: &'a [Post], filter: &PostFilter) -> Vec<&'a Post> {
    let matching = posts.iter().filter(|p| filter.matches(p));
    let skipped = matching.skip(filter.offset.unwrap_or(0));
    match filter.limit {
        Some(limit) => skipped.take(limit.get()).collect(),
        None => skipped.collect(),
    }
}

/// One page of the filtered listing; `offset` and `limit` of the filter
/// are ignored in favour of the page window
pub fn paginate<'a>(
    posts: &'a [Post],
    filter: &PostFilter,
    page: usize,
    per_page: usize,
) -> Result<(Vec<&'a Post>, Pagination), QueryError> {
    let matching: Vec<&Post> = posts.iter().filter(|p| filter.matches(p)).collect();
    let pagination = Pagination::new(page, per_page, matching.len())?;
    let window = matching[pagination.range()].to_vec();
    Ok((window, pagination))
}

/// The newest `count` posts
pub fn recent(posts: &[Post], count: usize) -> &[Post] {
    &posts[..count.min(posts.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(file: &str, categories: &[&str], tags: &[&str]) -> Post {
        let raw = format!(
            "---\ncategories: [{}]\ntags: [{}]\n---\nBody of {}\n",
            categories.join(", "),
            tags.join(", "),
            file
        );
        Post::parse(file, &raw, 200).unwrap()
    }

    /// Newest first, like the loader returns them
    fn collection() -> Vec<Post> {
        vec![
            post("2021-05-01-post-e.md", &["Python"], &["django"]),
            post("2021-04-01-post-d.md", &["rails"], &["ruby", "testing"]),
            post("2021-03-01-post-b.md", &["rails"], &["python"]),
            post("2021-02-01-post-c.md", &["devops"], &["Ruby"]),
            post("2021-01-01-post-a.md", &["rails"], &["ruby"]),
        ]
    }

    fn slugs<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<&'a str> {
        posts.into_iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_find_by_slug_and_date_path() {
        let posts = collection();
        for p in &posts {
            assert_eq!(find_by_key(&posts, &p.slug), Some(p));
            assert_eq!(find_by_key(&posts, &p.date_path()), Some(p));
        }
        let a = find_by_key(&posts, "/2021/01/01/post-a/").unwrap();
        assert_eq!(a.slug, "post-a");
    }

    #[test]
    fn test_find_not_found() {
        let posts = collection();
        assert!(find_by_key(&posts, "definitely-absent-key").is_none());
        assert!(find_by_key(&posts, "2021/01/02/post-a").is_none());
        assert!(find_by_key(&posts, "2021/01/post-a").is_none());
        assert!(find_by_key(&[], "post-a").is_none());
    }

    #[test]
    fn test_by_category_ignores_case() {
        let posts = collection();
        assert_eq!(
            slugs(by_category(&posts, "RAILS")),
            vec!["post-d", "post-b", "post-a"]
        );
        assert_eq!(slugs(by_category(&posts, "python")), vec!["post-e"]);
        assert!(by_category(&posts, "absent-category").is_empty());
    }

    #[test]
    fn test_by_tag() {
        let posts = collection();
        assert_eq!(slugs(by_tag(&posts, "python")), vec!["post-b"]);
        assert_eq!(
            slugs(by_tag(&posts, "ruby")),
            vec!["post-d", "post-c", "post-a"]
        );
    }

    #[test]
    fn test_related_scores() {
        let posts = collection();
        let a = &posts[4];
        let related = related(&posts, a, 4);
        let pairs: Vec<_> = related.iter().map(|r| (r.post.slug.as_str(), r.score)).collect();
        // post-d: rails + ruby, post-b: rails, post-c: Ruby
        assert_eq!(pairs, vec![("post-d", 3), ("post-b", 2), ("post-c", 1)]);
    }

    #[test]
    fn test_related_excludes_self_and_unrelated() {
        let posts = collection();
        for p in &posts {
            for r in related(&posts, p, 10) {
                assert_ne!(r.post.slug, p.slug);
                let shares = r.post.categories.iter().any(|c| p.has_category(c))
                    || r.post.tags.iter().any(|t| p.has_tag(t));
                assert!(shares);
            }
        }
        // post-e shares nothing with anyone
        assert!(related(&posts, &posts[0], 4).is_empty());
    }

    #[test]
    fn test_related_ties_keep_collection_order() {
        let posts = vec![
            post("2021-03-01-x.md", &["go"], &[]),
            post("2021-02-01-y.md", &["go"], &[]),
            post("2021-01-01-z.md", &["go"], &[]),
        ];
        let related = related(&posts, &posts[2], 4);
        assert_eq!(slugs(related.iter().map(|r| r.post)), vec!["x", "y"]);
        let limited = super::related(&posts, &posts[2], 1);
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].post.slug, "x");
    }

    #[test]
    fn test_scenario_two_posts() {
        let posts = vec![
            post("2021-03-01-post-b.md", &["rails"], &["python"]),
            post("2021-01-01-post-a.md", &["rails"], &["ruby"]),
        ];
        let b = &posts[0];
        let related = related(&posts, b, 4);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].post.slug, "post-a");
        assert_eq!(related[0].score, 2);
        assert_eq!(slugs(by_tag(&posts, "python")), vec!["post-b"]);
        assert_eq!(find_by_key(&posts, "2021/01/01/post-a").unwrap().slug, "post-a");
    }

    #[test]
    fn test_aggregates_sorted_and_unique() {
        let posts = collection();
        assert_eq!(all_categories(&posts), vec!["Python", "devops", "rails"]);
        assert_eq!(
            all_tags(&posts),
            vec!["Ruby", "django", "python", "ruby", "testing"]
        );
        assert!(all_tags(&[]).is_empty());
    }

    #[test]
    fn test_filtered_pagination() {
        let posts = collection();
        let first_two = filtered(&posts, &PostFilter::default().limit(2).offset(0));
        assert_eq!(slugs(first_two), vec!["post-e", "post-d"]);

        let rest = filtered(&posts, &PostFilter::default().offset(3));
        assert_eq!(slugs(rest), vec!["post-c", "post-a"]);

        assert!(filtered(&posts, &PostFilter::default().offset(99)).is_empty());
        // a zero limit means no limit
        assert_eq!(filtered(&posts, &PostFilter::default().limit(0)).len(), 5);
    }

    #[test]
    fn test_filtered_category_and_tag() {
        let posts = collection();
        let filter = PostFilter::default().category("Rails").tag("ruby");
        assert_eq!(slugs(filtered(&posts, &filter)), vec!["post-d", "post-a"]);

        let filter = PostFilter::default().category("rails").tag("ruby").offset(1).limit(5);
        assert_eq!(slugs(filtered(&posts, &filter)), vec!["post-a"]);

        let filter = PostFilter::default().category("");
        assert_eq!(filtered(&posts, &filter).len(), 5);
    }

    #[test]
    fn test_paginate() {
        let posts = collection();
        let (page, info) = paginate(&posts, &PostFilter::default(), 2, 2).unwrap();
        assert_eq!(slugs(page), vec!["post-b", "post-c"]);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next_page && info.has_previous_page);

        let filter = PostFilter::default().category("rails");
        let (page, info) = paginate(&posts, &filter, 2, 2).unwrap();
        assert_eq!(slugs(page), vec!["post-a"]);
        assert_eq!(info.total_posts, 3);
        assert!(!info.has_next_page);

        assert_eq!(
            paginate(&posts, &PostFilter::default(), 0, 2).unwrap_err(),
            QueryError::ZeroPage
        );
    }

    #[test]
    fn test_recent() {
        let posts = collection();
        assert_eq!(slugs(recent(&posts, 3)), vec!["post-e", "post-d", "post-b"]);
        assert_eq!(recent(&posts, 10).len(), 5);
    }
}
