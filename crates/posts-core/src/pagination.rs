//! Pagination engine - page requests and paged slices.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A validated `(page_index, page_size)` pair.
///
/// The index is zero-based; the size is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_index: u64,
    page_size: u64,
}

impl PageRequest {
    pub fn new(page_index: u64, page_size: u64) -> Result<Self, DomainError> {
        if page_size == 0 {
            return Err(DomainError::Validation(
                "pageSize must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            page_index,
            page_size,
        })
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of items to skip before this page starts.
    pub fn offset(&self) -> u64 {
        self.page_index.saturating_mul(self.page_size)
    }

    /// Whether another page follows this one for `total_items` matches.
    pub fn has_next(&self, total_items: u64) -> bool {
        self.page_index
            .saturating_add(1)
            .saturating_mul(self.page_size)
            < total_items
    }

    /// The request for the page after this one.
    pub fn next(&self) -> Self {
        Self {
            page_index: self.page_index.saturating_add(1),
            page_size: self.page_size,
        }
    }
}

/// One page of a filtered, ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedItems<T> {
    pub page_index: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub items: Vec<T>,
    pub next_page: Option<String>,
}

impl<T> PaginatedItems<T> {
    /// Build a page from a slice that was already cut for `request`.
    pub fn new(request: PageRequest, total_items: u64, items: Vec<T>) -> Self {
        Self {
            page_index: request.page_index,
            page_size: request.page_size,
            total_items,
            items,
            next_page: None,
        }
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }

    pub fn has_next(&self) -> bool {
        self.request().has_next(self.total_items)
    }

    /// Attach the link to the following page. The link is computed by the
    /// caller, which knows how pages are addressed.
    pub fn with_next_page(mut self, link: Option<String>) -> Self {
        self.next_page = link;
        self
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedItems<U> {
        PaginatedItems {
            page_index: self.page_index,
            page_size: self.page_size,
            total_items: self.total_items,
            items: self.items.into_iter().map(f).collect(),
            next_page: self.next_page,
        }
    }
}

/// Page through an already filtered set held in memory.
///
/// Items are ordered by descending `key` before the slice is taken, so the
/// total and the slice always come from the same input.
pub fn paginate<T, K, F>(
    items: impl IntoIterator<Item = T>,
    request: PageRequest,
    key: F,
) -> PaginatedItems<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut matching: Vec<T> = items.into_iter().collect();
    let total_items = matching.len() as u64;

    matching.sort_by(|a, b| key(b).cmp(&key(a)));

    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.page_size()).unwrap_or(usize::MAX);
    let page: Vec<T> = matching.into_iter().skip(offset).take(take).collect();

    PaginatedItems::new(request, total_items, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: u64, size: u64) -> PageRequest {
        PageRequest::new(index, size).unwrap()
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_offset_and_next() {
        let request = page(3, 10);
        assert_eq!(request.offset(), 30);
        assert_eq!(request.next(), page(4, 10));
    }

    #[test]
    fn test_has_next_boundaries() {
        assert!(page(0, 2).has_next(3));
        assert!(!page(1, 2).has_next(3));
        assert!(!page(0, 2).has_next(2));
        assert!(!page(0, 5).has_next(0));
        assert!(!page(u64::MAX, u64::MAX).has_next(u64::MAX));
    }

    #[test]
    fn test_paginate_orders_descending() {
        let result = paginate(vec![1, 2, 3], page(0, 2), |n| *n);

        assert_eq!(result.items, vec![3, 2]);
        assert_eq!(result.total_items, 3);
        assert!(result.has_next());

        let second = paginate(vec![1, 2, 3], page(1, 2), |n| *n);
        assert_eq!(second.items, vec![1]);
        assert!(!second.has_next());
    }

    #[test]
    fn test_paginate_past_last_page_is_empty() {
        let result = paginate(vec![5, 6], page(7, 2), |n| *n);

        assert!(result.items.is_empty());
        assert_eq!(result.total_items, 2);
        assert_eq!(result.page_index, 7);
    }

    #[test]
    fn test_items_never_exceed_page_size() {
        let data: Vec<i64> = (1..=23).collect();
        for size in 1..=7 {
            for index in 0..6 {
                let result = paginate(data.clone(), page(index, size), |n| *n);
                assert!(result.items.len() as u64 <= size);
                assert_eq!(result.total_items, 23);
            }
        }
    }

    #[test]
    fn test_empty_page_serializes_camel_case() {
        let result: PaginatedItems<i64> = PaginatedItems::new(page(0, 5), 0, Vec::new());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "pageIndex": 0,
                "pageSize": 5,
                "totalItems": 0,
                "items": [],
                "nextPage": null
            })
        );
    }
}
