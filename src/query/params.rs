//! The normalized form of a collection query and its re-emission as link parameters.

use crate::query::links::RouteParams;
use crate::query::pagination::PageRequest;

pub const ORDER_BY: &str = "orderBy";
pub const FIELDS: &str = "fields";
pub const PAGE_NUMBER: &str = "pageNumber";
pub const PAGE_SIZE: &str = "pageSize";

/// Everything a client asked of a collection endpoint.
///
/// Filters keep their insertion order so page links list them the same way
/// on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    pub order_by: Option<String>,
    pub fields: Option<String>,
    pub filters: Vec<(String, String)>,
    pub page: PageRequest,
}

impl ResourceQuery {
    pub fn new(page: PageRequest) -> Self {
        Self {
            order_by: None,
            fields: None,
            filters: Vec::new(),
            page,
        }
    }

    pub fn with_order_by(mut self, order_by: Option<String>) -> Self {
        self.order_by = non_blank(order_by);
        self
    }

    pub fn with_fields(mut self, fields: Option<String>) -> Self {
        self.fields = non_blank(fields);
        self
    }

    /// Adds a filter; blank or missing values are dropped.
    pub fn with_filter(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        if let Some(value) = non_blank(value) {
            self.filters.push((name.into(), value));
        }
        self
    }

    pub fn order_by_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.order_by.as_deref().unwrap_or(default)
    }

    pub fn fields(&self) -> &str {
        self.fields.as_deref().unwrap_or("")
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parameters for the same query at `page_number`.
    ///
    /// Emitted as `orderBy`, `fields`, the filters, `pageNumber`, `pageSize`;
    /// absent values are omitted.
    pub fn route_params(&self, page_number: u32) -> RouteParams {
        let params = RouteParams::new()
            .with_opt(ORDER_BY, self.order_by.as_deref())
            .with_opt(FIELDS, self.fields.as_deref());
        self.filters
            .iter()
            .fold(params, |params, (name, value)| params.with(name.as_str(), value))
            .with(PAGE_NUMBER, page_number)
            .with(PAGE_SIZE, self.page.page_size())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
