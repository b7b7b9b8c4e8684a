//! Pagination window and metadata calculation.

use super::types::{PageRef, PaginationMeta};

/// Index window covered by a page.
///
/// Used only to decide the existence of adjacent pages; the actual
/// skip/take mechanism is `skip = start`, `take = limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u64,
    pub end: u64,
}

/// Compute the index window for a page.
pub fn window(page: u64, limit: u64) -> PageWindow {
    let start = page.saturating_sub(1) * limit;
    PageWindow {
        start,
        end: page * limit,
    }
}

/// Compute next/previous descriptors from the window and total count.
///
/// `next` is present iff records exist past the window's end; `prev`
/// iff the window does not start at index zero. The limit is echoed
/// unchanged.
pub fn metadata(page: u64, limit: u64, total: u64) -> PaginationMeta {
    let window = window(page, limit);

    let next = (window.end < total).then(|| PageRef {
        page: page + 1,
        limit,
    });
    let prev = (window.start > 0).then(|| PageRef {
        page: page - 1,
        limit,
    });

    PaginationMeta { next, prev }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn window_math() {
        assert_eq!(window(1, 25), PageWindow { start: 0, end: 25 });
        assert_eq!(window(3, 25), PageWindow { start: 50, end: 75 });
    }

    #[test]
    fn first_page_of_57_has_next_only() {
        let meta = metadata(1, 25, 57);
        assert_eq!(meta.next, Some(PageRef { page: 2, limit: 25 }));
        assert_eq!(meta.prev, None);
    }

    #[test]
    fn middle_page_of_57_has_both() {
        let meta = metadata(2, 25, 57);
        assert_eq!(meta.next, Some(PageRef { page: 3, limit: 25 }));
        assert_eq!(meta.prev, Some(PageRef { page: 1, limit: 25 }));
    }

    #[test]
    fn last_page_of_57_has_prev_only() {
        let meta = metadata(3, 25, 57);
        assert_eq!(meta.next, None);
        assert_eq!(meta.prev, Some(PageRef { page: 2, limit: 25 }));
    }

    #[test]
    fn zero_total_has_neither() {
        let meta = metadata(1, 25, 0);
        assert_eq!(meta.next, None);
        assert_eq!(meta.prev, None);
    }

    #[test]
    fn exact_page_boundary_has_no_next() {
        let meta = metadata(2, 25, 50);
        assert_eq!(meta.next, None);
        assert_eq!(meta.prev, Some(PageRef { page: 1, limit: 25 }));
    }
}
