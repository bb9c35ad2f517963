//! Pagination over fully gathered result lists.
//!
//! Slicing is a pure post-processing step: operations collect the
//! complete ordered result first, so pages are stable and
//! order-consistent across calls against the immutable snapshot.

use serde::{Deserialize, Serialize};

/// One page of an ordered result list, with total-count metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page number as requested by the caller.
    pub page: i64,
    pub page_size: i64,
    pub total_items: usize,
    /// `ceil(total_items / page_size)`, computed from the full set so a
    /// client can detect a request past the end.
    pub total_pages: i64,
}

/// Slices `items` into the requested page.
///
/// `page` and `page_size` are taken as supplied, without clamping. Any
/// combination that produces a negative or out-of-range slice yields an
/// empty item list rather than an error.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> Page<T> {
    let total_items = items.len();
    let total_pages = if page_size > 0 && total_items > 0 {
        (total_items as i64 - 1) / page_size + 1
    } else {
        0
    };

    let start = page.checked_sub(1).and_then(|p| p.checked_mul(page_size));
    let items = match start {
        Some(start) if page >= 1 && page_size >= 1 && start < total_items as i64 => items
            .into_iter()
            .skip(start as usize)
            .take(page_size as usize)
            .collect(),
        _ => Vec::new(),
    };

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_first_page() {
        let page = paginate((1..=25).collect::<Vec<i32>>(), 1, 10);
        assert_eq!(page.items, (1..=10).collect::<Vec<i32>>());
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let page = paginate((1..=25).collect::<Vec<i32>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_paginate_past_the_end_is_empty() {
        let page = paginate((1..=25).collect::<Vec<i32>>(), 4, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paginate_empty_source() {
        let page = paginate(Vec::<i32>::new(), 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_paginate_rejects_nonpositive_inputs_without_error() {
        let items: Vec<i32> = (1..=5).collect();
        assert!(paginate(items.clone(), 0, 10).items.is_empty());
        assert!(paginate(items.clone(), -3, 10).items.is_empty());
        assert!(paginate(items.clone(), 1, 0).items.is_empty());
        assert!(paginate(items, 1, -1).items.is_empty());
    }

    #[test]
    fn test_paginate_is_idempotent() {
        let items: Vec<i32> = (1..=17).collect();
        let a = paginate(items.clone(), 2, 5);
        let b = paginate(items, 2, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_pages_sum_to_total() {
        let items: Vec<i32> = (1..=17).collect();
        let first = paginate(items.clone(), 1, 5);
        let mut seen = 0;
        for page_no in 1..=first.total_pages {
            seen += paginate(items.clone(), page_no, 5).items.len();
        }
        assert_eq!(seen, first.total_items);
    }

    #[test]
    fn test_paginate_huge_page_number_does_not_overflow() {
        let page = paginate(vec![1, 2, 3], i64::MAX, i64::MAX);
        assert!(page.items.is_empty());
    }
}
