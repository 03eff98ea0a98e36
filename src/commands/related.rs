//! List posts related to a post

use anyhow::Result;

use crate::Folio;

/// Print up to `max` posts related to the post at `key`
pub fn run(folio: &Folio, key: &str, max: Option<usize>) -> Result<()> {
    let blog = folio.blog();
    let Some(post) = blog.get(key)? else {
        anyhow::bail!("Post not found: {}", key);
    };

    let max = max.unwrap_or(folio.config.related_posts);
    let related = blog.related_scored(&post, max)?;

    println!("Related to {} ({}):", post.slug, related.len());
    for scored in related {
        println!(
            "  {} - {} [{}] score {}",
            scored.post.date.format("%Y-%m-%d"),
            scored.post.title,
            scored.post.slug,
            scored.score
        );
    }

    Ok(())
}
