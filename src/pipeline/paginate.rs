use serde::Serialize;

pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    let per_page = items_per_page.max(1);
    total_items.div_ceil(per_page).max(1)
}

/// One page of a collection.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    /// Offset of `items[0]` in the full collection.
    pub start_index: usize,
}

/// Fixed-size slicing. A page outside `1..=total_pages` yields an empty slice
/// rather than an error.
pub fn paginate<T>(rows: &[T], current_page: usize, items_per_page: usize) -> Page<'_, T> {
    let per_page = items_per_page.max(1);
    let pages = total_pages(rows.len(), per_page);
    if current_page == 0 || current_page > pages {
        return Page {
            items: &[],
            total_pages: pages,
            start_index: rows.len(),
        };
    }
    let start = (current_page - 1).saturating_mul(per_page).min(rows.len());
    let end = start.saturating_add(per_page).min(rows.len());
    Page {
        items: &rows[start..end],
        total_pages: pages,
        start_index: start,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    current_page: usize,
    items_per_page: usize,
    total_items: usize,
}

impl PaginationState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.items_per_page)
    }

    /// Re-clamps the current page against a new collection size.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    /// Returns `false` and leaves the state alone when `page` is out of range.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_page.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(self.current_page.saturating_sub(1))
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Page buttons to show: the first page, then up to `window` pages
    /// starting just before the current one once it moves past the start.
    pub fn visible_pages(&self, window: usize) -> Vec<usize> {
        let pages = self.total_pages();
        let mut out = vec![1];
        if pages <= 1 {
            return out;
        }
        let middle = window.min(pages.saturating_sub(2).max(1));
        let first = if self.current_page > window {
            self.current_page - 1
        } else {
            2
        };
        for page in first..first + middle {
            if page > 1 && page <= pages && !out.contains(&page) {
                out.push(page);
            }
        }
        if !out.contains(&pages) {
            out.push(pages);
        }
        out
    }
}
