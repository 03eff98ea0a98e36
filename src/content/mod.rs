//! Content module - posts, front-matter, and derived fields

mod frontmatter;
pub mod loader;
mod post;
mod reading;
mod toc;

pub use frontmatter::{parse_date_string, FrontMatter, Terms};
pub use post::{FileName, Post};
pub use reading::{count_words, derive_excerpt, ReadingTime};
pub use toc::{heading_anchor, table_of_contents, TocEntry};

pub(crate) use post::contains_ignore_case;
