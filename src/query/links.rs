//! Hypermedia link generation.
//!
//! Links are produced from a route name and an ordered parameter list by a
//! [`UrlResolver`]. The resolver must be a pure function of its inputs so
//! the same request always yields byte-identical hrefs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use utoipa::ToSchema;

use crate::query::error::{QueryError, QueryResult};
use crate::query::params::ResourceQuery;

/// A navigation or affordance link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LinkDescriptor {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl LinkDescriptor {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.into(),
        }
    }
}

/// Ordered route parameters. Order is kept so generated query strings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter, replacing an earlier one with the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Appends `name` only when `value` is present.
    pub fn with_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Turns a route name and parameters into an href.
pub trait UrlResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, route: &str, params: &RouteParams) -> QueryResult<String>;
}

/// [`UrlResolver`] over named path templates such as `/api/authors/{id}`.
///
/// Parameters that fill a `{placeholder}` become path segments, the rest
/// are appended as a URL-encoded query string in their given order.
#[derive(Debug, Clone)]
pub struct RouteTable {
    base_url: String,
    routes: HashMap<String, String>,
}

impl RouteTable {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            routes: HashMap::new(),
        }
    }

    pub fn route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.insert(name.into(), template.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl UrlResolver for RouteTable {
    fn resolve(&self, route: &str, params: &RouteParams) -> QueryResult<String> {
        let template = self
            .routes
            .get(route)
            .ok_or_else(|| QueryError::RouteNotFound(route.to_string()))?;

        let mut path = String::with_capacity(template.len());
        let mut used = Vec::new();
        let mut rest = template.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            let value = params
                .get(name)
                .ok_or_else(|| QueryError::MissingRouteParameter {
                    route: route.to_string(),
                    parameter: name.to_string(),
                })?;
            path.push_str(&rest[..start]);
            path.push_str(value);
            used.push(name);
            rest = &rest[start + len + 1..];
        }
        path.push_str(rest);

        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (name, value) in params.iter().filter(|(n, _)| !used.contains(n)) {
            query.append_pair(name, value);
            has_query = true;
        }

        let mut href = format!("{}{}", self.base_url, path);
        if has_query {
            href.push('?');
            href.push_str(&query.finish());
        }
        Ok(href)
    }
}

/// A state transition offered on a resource, e.g. `delete_author` via DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance {
    pub route: &'static str,
    pub rel: &'static str,
    pub method: &'static str,
}

impl Affordance {
    pub const fn new(route: &'static str, rel: &'static str, method: &'static str) -> Self {
        Self { route, rel, method }
    }
}

/// Builds resource, collection and page links through a [`UrlResolver`].
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    resolver: Arc<dyn UrlResolver>,
}

impl LinkBuilder {
    pub fn new(resolver: Arc<dyn UrlResolver>) -> Self {
        Self { resolver }
    }

    pub fn href(&self, route: &str, params: &RouteParams) -> QueryResult<String> {
        self.resolver.resolve(route, params)
    }

    /// The `self` link of a resource, then one link per affordance.
    ///
    /// `fields` is carried on the self link when non-blank so following it
    /// returns the same projection.
    pub fn resource_links(
        &self,
        self_route: &str,
        params: &RouteParams,
        fields: Option<&str>,
        affordances: &[Affordance],
    ) -> QueryResult<Vec<LinkDescriptor>> {
        let self_params = match fields.map(str::trim).filter(|f| !f.is_empty()) {
            Some(fields) => params.clone().with("fields", fields),
            None => params.clone(),
        };

        let mut links = Vec::with_capacity(affordances.len() + 1);
        links.push(LinkDescriptor::new(
            self.resolver.resolve(self_route, &self_params)?,
            "self",
            "GET",
        ));
        for affordance in affordances {
            links.push(LinkDescriptor::new(
                self.resolver.resolve(affordance.route, params)?,
                affordance.rel,
                affordance.method,
            ));
        }
        Ok(links)
    }

    /// The `self` link of a collection.
    pub fn collection_link(&self, route: &str, params: &RouteParams) -> QueryResult<LinkDescriptor> {
        Ok(LinkDescriptor::new(
            self.resolver.resolve(route, params)?,
            "self",
            "GET",
        ))
    }

    /// Href of another page of the same query.
    pub fn page_link(&self, route: &str, query: &ResourceQuery, page_number: u32) -> QueryResult<String> {
        self.resolver.resolve(route, &query.route_params(page_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new("http://localhost:3000/")
            .route("GetAuthor", "/api/authors/{id}")
            .route("DeleteAuthor", "/api/authors/{id}")
            .route("GetBook", "/api/authors/{authorId}/books/{id}")
            .route("GetAuthors", "/api/authors")
    }

    #[test]
    fn test_resolve_path_and_query() {
        let params = RouteParams::new()
            .with("id", "42")
            .with("fields", "id, name");
        let href = table().resolve("GetAuthor", &params).unwrap();
        assert_eq!(href, "http://localhost:3000/api/authors/42?fields=id%2C+name");
    }

    #[test]
    fn test_resolve_multiple_placeholders() {
        let params = RouteParams::new().with("id", "b").with("authorId", "a");
        let href = table().resolve("GetBook", &params).unwrap();
        assert_eq!(href, "http://localhost:3000/api/authors/a/books/b");
    }

    #[test]
    fn test_resolve_errors() {
        let err = table().resolve("Nope", &RouteParams::new()).unwrap_err();
        assert!(matches!(err, QueryError::RouteNotFound(name) if name == "Nope"));

        let err = table().resolve("GetAuthor", &RouteParams::new()).unwrap_err();
        assert!(matches!(err, QueryError::MissingRouteParameter { parameter, .. } if parameter == "id"));
    }

    #[test]
    fn test_route_params_replace_keeps_position() {
        let params = RouteParams::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3)
            .with_opt("c", None::<&str>);
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_resource_links() {
        let builder = LinkBuilder::new(Arc::new(table()));
        let params = RouteParams::new().with("id", "7");
        let affordances = [Affordance::new("DeleteAuthor", "delete_author", "DELETE")];

        let links = builder
            .resource_links("GetAuthor", &params, Some("name"), &affordances)
            .unwrap();
        assert_eq!(
            links,
            vec![
                LinkDescriptor::new("http://localhost:3000/api/authors/7?fields=name", "self", "GET"),
                LinkDescriptor::new("http://localhost:3000/api/authors/7", "delete_author", "DELETE"),
            ]
        );

        let links = builder
            .resource_links("GetAuthor", &params, Some("  "), &[])
            .unwrap();
        assert_eq!(links[0].href, "http://localhost:3000/api/authors/7");
    }

    #[test]
    fn test_collection_link() {
        let builder = LinkBuilder::new(Arc::new(table()));
        let link = builder.collection_link("GetAuthors", &RouteParams::new()).unwrap();
        assert_eq!(link, LinkDescriptor::new("http://localhost:3000/api/authors", "self", "GET"));
    }
}
