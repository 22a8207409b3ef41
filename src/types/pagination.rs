use serde::{Deserialize, Serialize};

/// Pagination of the cached result set. Reset to page 1 on every search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationState {
    /// 1-based.
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_items: usize,
}

impl PaginationState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.items_per_page.max(1))
    }
}

/// One entry of the rendered pagination bar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "page", rename_all = "snake_case")]
pub enum PageControl {
    Page(usize),
    Ellipsis,
}
