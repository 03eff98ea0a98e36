//! Show a single post

use anyhow::Result;

use crate::content::table_of_contents;
use crate::Folio;

/// Print a post resolved by slug or `year/month/day/slug`
pub fn run(folio: &Folio, key: &str) -> Result<()> {
    let blog = folio.blog();
    let posts = blog.all_posts()?;
    let Some(post) = crate::query::find_by_key(&posts, key) else {
        anyhow::bail!("Post not found: {}", key);
    };

    println!("{}", post.title);
    println!("  slug:        {}", post.slug);
    println!("  date:        {}", post.date.format("%Y-%m-%d"));
    println!("  permalink:   {}", post.permalink(&folio.config.blog_root));
    println!("  categories:  {}", post.categories.join(", "));
    println!("  tags:        {}", post.tags.join(", "));
    println!("  reading:     {}", post.reading_time);
    println!("  description: {}", post.meta_description);
    println!("  keywords:    {}", post.meta_keywords);

    let toc = table_of_contents(&post.content);
    if !toc.is_empty() {
        println!("Contents:");
        for entry in toc {
            let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
            println!("{}{} (#{})", indent, entry.text, entry.id);
        }
    }

    if let Some(newer) = post.prev(&posts) {
        println!("Newer: {} [{}]", newer.title, newer.slug);
    }
    if let Some(older) = post.next(&posts) {
        println!("Older: {} [{}]", older.title, older.slug);
    }

    Ok(())
}
