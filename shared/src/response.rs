//! Pagination types shared by list endpoints

use serde::{Deserialize, Serialize};

/// Default page size for search and browse
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Upper bound for any requested page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-based)
    pub current_page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Create a new pagination
    pub fn new(current_page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64) as u32
        };
        Self {
            current_page,
            limit,
            total,
            total_pages,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }

    /// Offset of the first item on the current page
    pub fn offset(&self) -> usize {
        (self.current_page.saturating_sub(1) as usize) * self.limit as usize
    }
}

/// Normalize raw page/limit input into a 1-based page and a bounded page size.
pub fn clamp_page(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// List of items
    pub items: Vec<T>,
    /// Pagination metadata
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    /// Slice one page out of an already ordered list
    pub fn from_sorted(all: Vec<T>, page: u32, limit: u32) -> Self {
        let pagination = Pagination::new(page, limit, all.len() as u64);
        let items = all
            .into_iter()
            .skip(pagination.offset())
            .take(limit as usize)
            .collect();
        Self { items, pagination }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_flags() {
        let p = Pagination::new(1, 20, 45);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let p = Pagination::new(3, 20, 45);
        assert!(!p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::new(1, 20, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
    }

    #[test]
    fn test_page_beyond_last_is_empty() {
        let page = PaginatedResponse::from_sorted((0..5).collect::<Vec<_>>(), 4, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(None, None, 20), (1, 20));
        assert_eq!(clamp_page(Some(0), Some(0), 20), (1, 1));
        assert_eq!(clamp_page(Some(2), Some(500), 10), (2, MAX_PAGE_SIZE));
    }
}
