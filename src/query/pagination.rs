//! Page requests, paged results and the navigation metadata sent alongside them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::query::error::QueryResult;
use crate::query::links::LinkBuilder;
use crate::query::params::ResourceQuery;

/// Default and upper bound applied to client page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingPolicy {
    default_page_size: u32,
    max_page_size: u32,
}

impl PagingPolicy {
    /// Both sizes are raised to at least 1 and the default never exceeds the maximum.
    pub fn new(default_page_size: u32, max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// Resolves the raw query values into a page request.
    ///
    /// A missing page number means the first page. A missing page size uses
    /// the default; a present one is clamped to `[1, max_page_size]`.
    pub fn page_request(&self, page_number: Option<u32>, page_size: Option<u32>) -> PageRequest {
        let size = page_size
            .map(|s| s.clamp(1, self.max_page_size))
            .unwrap_or(self.default_page_size);
        PageRequest::new(page_number.unwrap_or(1), size)
    }
}

impl Default for PagingPolicy {
    fn default() -> Self {
        Self::new(10, 20)
    }
}

/// 1-based page number and a positive page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding this page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }

    pub fn take(&self) -> u32 {
        self.page_size
    }
}

/// One page of items with the counts needed to navigate the rest.
///
/// The derived values are computed on demand from `total_count`,
/// `page_size` and `current_page` and cannot drift from them.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    items: Vec<T>,
    total_count: u64,
    page_size: u32,
    current_page: u32,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page_size: request.page_size(),
            current_page: request.page_number(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current_page) < self.total_pages()
    }

    /// Converts every item, keeping the page counts.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<PagedList<U>, E> {
        Ok(PagedList {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
        })
    }
}

/// Navigation metadata serialized into the `X-Pagination` response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: u64,
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u64,
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
}

impl PaginationMetadata {
    /// Compact JSON used as the header value.
    pub fn to_header_value(&self) -> QueryResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Builds [`PaginationMetadata`] for pages of one collection route.
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a> {
    links: &'a LinkBuilder,
    route: &'a str,
}

impl<'a> Paginator<'a> {
    pub fn new(links: &'a LinkBuilder, route: &'a str) -> Self {
        Self { links, route }
    }

    /// Metadata for `page`, with neighbour links that repeat every parameter
    /// of `query` except the page number.
    pub fn metadata<T>(&self, page: &PagedList<T>, query: &ResourceQuery) -> QueryResult<PaginationMetadata> {
        let previous_page_link = if page.has_previous() {
            Some(self.links.page_link(self.route, query, page.current_page() - 1)?)
        } else {
            None
        };
        let next_page_link = if page.has_next() {
            Some(self.links.page_link(self.route, query, page.current_page() + 1)?)
        } else {
            None
        };

        let metadata = PaginationMetadata {
            total_count: page.total_count(),
            page_size: page.page_size(),
            current_page: page.current_page(),
            total_pages: page.total_pages(),
            previous_page_link,
            next_page_link,
        };
        tracing::debug!(
            route = self.route,
            total_count = metadata.total_count,
            current_page = metadata.current_page,
            total_pages = metadata.total_pages,
            "Pagination metadata built"
        );
        Ok(metadata)
    }
}
