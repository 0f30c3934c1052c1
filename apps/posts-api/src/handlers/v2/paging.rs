//! Query-string decoding and next-page links for v2 list endpoints.

use actix_web::HttpRequest;

use posts_core::{PageRequest, PaginatedItems};
use posts_shared::dto::PageQuery;

use crate::middleware::error::{AppError, AppResult};

/// What a v2 list request asks for.
///
/// The wire format overloads `pageIndex`: absent or negative means "no
/// paging". That overload stops here; the repository only sees explicit
/// page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    All,
    Page(PageRequest),
}

impl ListMode {
    pub fn from_query(query: &PageQuery, default_page_size: u64) -> AppResult<Self> {
        match query.page_index {
            None => Ok(ListMode::All),
            Some(index) if index < 0 => Ok(ListMode::All),
            Some(index) => {
                page_request(index, query.page_size, default_page_size).map(ListMode::Page)
            }
        }
    }
}

/// Decode an explicit page; negative indexes are rejected.
pub fn page_request(
    page_index: i64,
    page_size: Option<i64>,
    default_page_size: u64,
) -> AppResult<PageRequest> {
    let page_index = u64::try_from(page_index)
        .map_err(|_| AppError::BadRequest("pageIndex must not be negative".to_string()))?;
    let page_size = match page_size {
        Some(size) => u64::try_from(size)
            .map_err(|_| AppError::BadRequest("pageSize must be greater than zero".to_string()))?,
        None => default_page_size,
    };

    Ok(PageRequest::new(page_index, page_size)?)
}

/// Fill in `nextPage` with a link to the same endpoint, one page further.
pub fn with_next_link<T>(req: &HttpRequest, page: PaginatedItems<T>) -> PaginatedItems<T> {
    if !page.has_next() {
        return page;
    }

    let next = page.request().next();
    let mut url = req.full_url();
    url.query_pairs_mut()
        .clear()
        .append_pair("pageIndex", &next.page_index().to_string())
        .append_pair("pageSize", &next.page_size().to_string());

    page.with_next_page(Some(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(index: Option<i64>, size: Option<i64>) -> PageQuery {
        PageQuery {
            page_index: index,
            page_size: size,
        }
    }

    #[test]
    fn test_missing_or_negative_index_lists_everything() {
        assert_eq!(ListMode::from_query(&query(None, Some(3)), 5).unwrap(), ListMode::All);
        assert_eq!(ListMode::from_query(&query(Some(-1), None), 5).unwrap(), ListMode::All);
    }

    #[test]
    fn test_default_page_size_applies() {
        let mode = ListMode::from_query(&query(Some(2), None), 5).unwrap();
        assert_eq!(mode, ListMode::Page(PageRequest::new(2, 5).unwrap()));
    }

    #[test]
    fn test_invalid_sizes_are_rejected() {
        assert!(matches!(
            page_request(0, Some(0), 5),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            page_request(0, Some(-3), 5),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            page_request(-1, Some(3), 5),
            Err(AppError::BadRequest(_))
        ));
    }
}
