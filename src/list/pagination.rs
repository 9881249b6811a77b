//! Page arithmetic for the derived view.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::types::DEFAULT_PAGE_SIZE;

/// 1-indexed page cursor with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: NonZeroUsize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: default_page_size(),
        }
    }
}

impl Pagination {
    pub fn new(page: usize, page_size: NonZeroUsize) -> Self {
        Self { page, page_size }
    }

    /// Index range of the current page within `len` items. Empty when the
    /// page is out of range (including page 0).
    pub fn slice_range(&self, len: usize) -> Range<usize> {
        let size = self.page_size.get();
        let Some(first) = self.page.checked_sub(1) else {
            return 0..0;
        };
        let start = first.saturating_mul(size).min(len);
        let end = self.page.saturating_mul(size).min(len);
        start..end
    }
}

pub(crate) fn default_page_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN)
}

/// Number of pages needed for `count` items; an empty result is one page.
pub fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_total_pages_never_below_one() {
        assert_eq!(total_pages(0, size(6)), 1);
        assert_eq!(total_pages(1, size(6)), 1);
        assert_eq!(total_pages(6, size(6)), 1);
        assert_eq!(total_pages(7, size(6)), 2);
        assert_eq!(total_pages(12, size(6)), 2);
        assert_eq!(total_pages(13, size(6)), 3);
    }

    #[test]
    fn test_total_pages_matches_ceiling_formula() {
        for page_size in 1..=8 {
            for count in 0..=40 {
                let expected = std::cmp::max(1, (count + page_size - 1) / page_size);
                assert_eq!(total_pages(count, size(page_size)), expected);
            }
        }
    }

    #[test]
    fn test_slice_range() {
        let p = |page| Pagination::new(page, size(6));
        assert_eq!(p(1).slice_range(7), 0..6);
        assert_eq!(p(2).slice_range(7), 6..7);
        assert_eq!(p(3).slice_range(7), 7..7);
        assert_eq!(p(0).slice_range(7), 0..0);
        assert_eq!(p(1).slice_range(0), 0..0);
    }

    #[test]
    fn test_slice_range_does_not_overflow() {
        let p = Pagination::new(usize::MAX, size(6));
        assert!(p.slice_range(10).is_empty());
    }

    #[test]
    fn test_default_page_size() {
        assert_eq!(Pagination::default().page_size.get(), DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::default().page, 1);
    }
}
