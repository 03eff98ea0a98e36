//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::Post;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let blog = folio.blog();
    let posts = blog.all_posts()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!(
                    "  {} - {} [{}] ({})",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug,
                    post.reading_time
                );
            }
        }
        "tag" | "tags" => {
            let tags = count_terms(&posts, |p| &p.tags);
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let categories = count_terms(&posts, |p| &p.categories);
            println!("Categories ({}):", categories.len());
            for (cat, count) in categories {
                println!("  {} ({})", cat, count);
            }
        }
        "route" | "routes" => {
            println!("Routes ({}):", posts.len());
            for post in &posts {
                println!("  {}", post.permalink(&folio.config.blog_root));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category, route",
                content_type
            );
        }
    }

    Ok(())
}

/// Count posts per term, most used first, then by name
fn count_terms<'a, F>(posts: &'a [Post], terms: F) -> Vec<(&'a str, usize)>
where
    F: Fn(&'a Post) -> &'a Vec<String>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for term in terms(post) {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    counts
}
