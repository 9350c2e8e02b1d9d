//! Pagination request/response types for list endpoints.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 30;
const MAX_PAGE_SIZE: u64 = 100;

/// Pagination query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageRequest {
    /// Page number clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Page size clamped to `1..=100`.
    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the current page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.page_size()
    }
}

/// A page of results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page (1-based).
    pub page: u64,
    /// Items per page.
    pub page_size: u64,
    /// Total items across all pages.
    pub total_items: u64,
    /// Total pages (at least 1).
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Builds a page from items and totals.
    #[must_use]
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        let page_size = request.page_size();
        let total_pages = total_items.div_ceil(page_size).max(1);
        Self {
            items,
            page: request.page(),
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 30, 1)] // empty still reports one page
    #[case(1, 30, 1)]
    #[case(30, 30, 1)]
    #[case(31, 30, 2)]
    #[case(90, 30, 3)]
    #[case(91, 30, 4)]
    fn test_total_pages(#[case] total: u64, #[case] size: u64, #[case] expected: u64) {
        let request = PageRequest { page: 1, page_size: size };
        let response = PageResponse::<u8>::new(Vec::new(), &request, total);
        assert_eq!(response.total_pages, expected);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest { page: 3, page_size: 30 };
        assert_eq!(request.offset(), 60);
    }

    #[test]
    fn test_page_size_clamped() {
        let request = PageRequest { page: 0, page_size: 1000 };
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 100);
    }

    #[test]
    fn test_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 30);
    }
}
