//! Page-number pagination for blog listings

use serde::Serialize;

use super::QueryError;

/// Pagination state of one listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// 1-based page number
    pub current_page: usize,
    pub total_pages: usize,
    pub per_page: usize,
    pub total_posts: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn new(
        current_page: usize,
        per_page: usize,
        total_posts: usize,
    ) -> Result<Self, QueryError> {
        if current_page == 0 {
            return Err(QueryError::ZeroPage);
        }
        if per_page == 0 {
            return Err(QueryError::ZeroPerPage);
        }

        let total_pages = total_posts.div_ceil(per_page);
        Ok(Self {
            current_page,
            total_pages,
            per_page,
            total_posts,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        })
    }

    /// Index range of this page's posts, clamped to the post count
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.per_page)
            .min(self.total_posts);
        let end = start.saturating_add(self.per_page).min(self.total_posts);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let p = Pagination::new(1, 10, 25).unwrap();
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(!p.has_previous_page);
        assert_eq!(p.range(), 0..10);
    }

    #[test]
    fn test_last_page() {
        let p = Pagination::new(3, 10, 25).unwrap();
        assert!(!p.has_next_page);
        assert!(p.has_previous_page);
        assert_eq!(p.range(), 20..25);
    }

    #[test]
    fn test_past_the_end() {
        let p = Pagination::new(7, 10, 25).unwrap();
        assert!(!p.has_next_page);
        assert!(p.range().is_empty());
    }

    #[test]
    fn test_empty_listing() {
        let p = Pagination::new(1, 10, 0).unwrap();
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(p.range().is_empty());
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(Pagination::new(0, 10, 5), Err(QueryError::ZeroPage));
        assert_eq!(Pagination::new(1, 0, 5), Err(QueryError::ZeroPerPage));
    }

    #[test]
    fn test_huge_page_number() {
        let p = Pagination::new(usize::MAX, 10, 5).unwrap();
        assert_eq!(p.range(), 5..5);
        assert!(!p.has_next_page);

        let p = Pagination::new(2, usize::MAX, 5).unwrap();
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.range(), 5..5);
    }
}
