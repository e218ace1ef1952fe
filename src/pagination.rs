//! Page-slicing helpers shared by the repository and the templates.

use serde::Serialize;

/// Default number of posts per rendered page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Pagination parameters applied inside repository queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

/// A single page of results together with paging metadata for templates.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, per_page: usize, total: usize) -> Self {
        let page = page.max(1);
        let total_pages = if per_page == 0 {
            1
        } else {
            total.div_ceil(per_page).max(1)
        };
        Self {
            has_previous: page > 1,
            has_next: page < total_pages,
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }
}
