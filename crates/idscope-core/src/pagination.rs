//! Slicing of ordered result sets into pages.

use crate::types::Page;

/// Pagination input rejected before any data is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Please provide valid page number or limit")]
pub struct PaginationError {
    pub page: i64,
    pub limit: i64,
}

/// Returns true when both the page number and the limit are positive.
pub fn validate_pagination_input(page: i64, limit: i64) -> bool {
    page > 0 && limit > 0
}

/// A validated page number (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, PaginationError> {
        let error = PaginationError { page, limit };
        if !validate_pagination_input(page, limit) {
            return Err(error);
        }
        let (Ok(page), Ok(limit)) = (usize::try_from(page), usize::try_from(limit)) else {
            return Err(error);
        };
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Cut the requested page out of `items`.
    ///
    /// Pages past the end come back empty rather than failing.
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let total_items_count = items.len();
        let start = (self.page - 1).saturating_mul(self.limit);
        let end = self.page.saturating_mul(self.limit);

        let items: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(end - start)
            .collect();

        Page {
            items,
            total_items_count,
            total_page_count: total_items_count.div_ceil(self.limit),
            previous: (start > 0).then(|| self.page - 1),
            next: (end < total_items_count).then(|| self.page + 1),
        }
    }
}

/// Validate the input, then return the requested page of `items`.
pub fn paginate<T>(items: Vec<T>, page: i64, limit: i64) -> Result<Page<T>, PaginationError> {
    Ok(PageRequest::new(page, limit)?.apply(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ITEMS: [u32; 7] = [1, 2, 3, 4, 5, 6, 7];

    #[test]
    fn test_first_page() {
        let page = paginate(ITEMS.to_vec(), 1, 3).unwrap();
        assert_eq!(page.total_items_count, 7);
        assert_eq!(page.previous, None);
        assert_eq!(page.next, Some(2));
        assert_eq!(page.total_page_count, 3);
        assert_eq!(page.items, vec![1, 2, 3]);
    }

    #[test]
    fn test_middle_page() {
        let page = paginate(ITEMS.to_vec(), 2, 3).unwrap();
        assert_eq!(page.previous, Some(1));
        assert_eq!(page.next, Some(3));
        assert_eq!(page.items, vec![4, 5, 6]);
    }

    #[test]
    fn test_last_page() {
        let page = paginate(ITEMS.to_vec(), 3, 3).unwrap();
        assert_eq!(page.previous, Some(2));
        assert_eq!(page.next, None);
        assert_eq!(page.total_page_count, 3);
        assert_eq!(page.items, vec![7]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(ITEMS.to_vec(), 5, 3).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.previous, Some(4));
        assert_eq!(page.next, None);
        assert_eq!(page.total_items_count, 7);
    }

    #[test]
    fn test_empty_items() {
        let page = paginate(Vec::<u32>::new(), 1, 5).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_page_count, 0);
        assert_eq!(page.previous, None);
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_invalid_input() {
        assert!(!validate_pagination_input(-1, -5));
        assert!(!validate_pagination_input(1, -5));
        assert!(!validate_pagination_input(-1, 5));
        assert!(!validate_pagination_input(0, 5));
        assert!(validate_pagination_input(1, 5));

        let err = paginate(ITEMS.to_vec(), -1, -5).unwrap_err();
        assert_eq!(err, PaginationError { page: -1, limit: -5 });
        assert_eq!(err.to_string(), "Please provide valid page number or limit");
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = paginate(ITEMS.to_vec(), i64::MAX, i64::MAX).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_page_count, 1);
    }

    proptest! {
        #[test]
        fn prop_pages_cover_all_items(len in 0usize..200, limit in 1i64..30) {
            let items: Vec<usize> = (0..len).collect();
            let first = paginate(items.clone(), 1, limit).unwrap();
            prop_assert_eq!(first.total_page_count, len.div_ceil(limit as usize));
            prop_assert_eq!(first.previous, None);

            let mut seen = Vec::new();
            for page_no in 1..=first.total_page_count {
                let page = paginate(items.clone(), page_no as i64, limit).unwrap();
                if page_no == first.total_page_count {
                    prop_assert_eq!(page.next, None);
                }
                seen.extend(page.items);
            }
            prop_assert_eq!(seen, items);
        }

        #[test]
        fn prop_paginate_is_deterministic(len in 0usize..50, page in 1i64..10, limit in 1i64..10) {
            let items: Vec<usize> = (0..len).collect();
            prop_assert_eq!(
                paginate(items.clone(), page, limit).unwrap(),
                paginate(items, page, limit).unwrap()
            );
        }
    }
}
