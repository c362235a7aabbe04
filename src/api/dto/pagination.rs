//! Paging parameters shared by collection endpoints.

use crate::error::{AppError, AppResult};
use crate::query::{PageRequest, PagingPolicy};

/// Response header carrying the JSON pagination metadata.
pub const PAGINATION_HEADER: &str = "x-pagination";

/// Turns the raw `pageNumber` and `pageSize` values into a page request.
///
/// A page number below 1 is rejected. Any integer page size is accepted and
/// clamped by `policy`, negative ones included.
pub fn page_request(
    policy: &PagingPolicy,
    page_number: Option<u32>,
    page_size: Option<i64>,
) -> AppResult<PageRequest> {
    if page_number == Some(0) {
        return Err(AppError::Validation {
            field: "pageNumber".to_string(),
            reason: "Page number must be at least 1".to_string(),
        });
    }
    let page_size = page_size.map(|size| u32::try_from(size.max(0)).unwrap_or(u32::MAX));
    Ok(policy.page_request(page_number, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_zero_is_rejected() {
        let policy = PagingPolicy::new(10, 20);
        let err = page_request(&policy, Some(0), None).unwrap_err();
        assert!(matches!(err, AppError::Validation { field, .. } if field == "pageNumber"));
    }

    #[test]
    fn test_page_size_is_clamped() {
        let policy = PagingPolicy::new(10, 20);
        let request = page_request(&policy, Some(3), Some(500)).unwrap();
        assert_eq!(request.page_number(), 3);
        assert_eq!(request.page_size(), 20);
        assert_eq!(page_request(&policy, None, None).unwrap().page_size(), 10);
        assert_eq!(page_request(&policy, None, Some(-5)).unwrap().page_size(), 1);
        assert_eq!(page_request(&policy, None, Some(99_999_999_999)).unwrap().page_size(), 20);
    }
}
