//! List pagination.
//!
//! List operations are count-then-slice: one `COUNT` query under the filter
//! criteria, then one bounded fetch, so page counts stay accurate.

use serde::Serialize;

/// Default page size when the caller does not specify one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Upper bound on a single page.
pub const MAX_LIMIT: u32 = 100;

/// A request for one page of a list.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Number of items per page.
    pub limit: u32,
}

impl PageRequest {
    /// Create a page request, clamping out-of-range inputs.
    ///
    /// Page numbers below 1 become 1; limits are clamped to
    /// `1..=`[`MAX_LIMIT`].
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Offset of the first item on this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results together with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of items matching the filter.
    pub total: i64,
    /// 1-based page number this page represents.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
    /// Total number of pages under the filter.
    pub pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page from a bounded fetch plus the matching total.
    #[must_use]
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            total
                .unsigned_abs()
                .div_ceil(u64::from(request.limit))
                .try_into()
                .unwrap_or(u32::MAX)
        };
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[test]
    fn test_inputs_clamped() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);

        let req = PageRequest::new(2, 10_000);
        assert_eq!(req.limit, MAX_LIMIT);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 41, PageRequest::new(1, 20));
        assert_eq!(page.pages, 3);

        let page = Page::<i32>::new(vec![], 0, PageRequest::new(1, 20));
        assert_eq!(page.pages, 0);
    }
}
