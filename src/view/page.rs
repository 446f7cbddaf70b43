use serde::Serialize;

pub const PAGE_SIZES: [usize; 3] = [10, 20, 50];
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    /// Sizes other than the offered ones fall back to the default.
    pub fn new(page: usize, page_size: usize) -> Self {
        let page_size = if PAGE_SIZES.contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };

        Self { page, page_size }
    }

    pub fn slice<T: Clone>(self, items: &[T]) -> Page<T> {
        let total = items.len();
        let start = self.page.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);

        Page {
            items: items[start..end].to_vec(),
            page: self.page,
            page_size: self.page_size,
            total,
            page_count: total.div_ceil(self.page_size),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub page_count: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.page_count
    }
}
