//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::api::routes::route_table;
use crate::error::AppResult;
use crate::query::{LinkBuilder, PagingPolicy};
use crate::repositories::LibraryRepository;
use crate::services::{property_mappings, Services};

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap; everything it holds is behind `Arc`s or `Copy`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Resolves route names to absolute hrefs
    pub links: LinkBuilder,
    /// Default and maximum page sizes of collection endpoints
    pub paging: PagingPolicy,
}

impl AppState {
    /// Creates the state over a repository.
    ///
    /// The property mappings are built here, once, and shared read-only by
    /// every request afterwards.
    ///
    /// # Arguments
    /// * `repo` - The library data source
    /// * `base_url` - Scheme and authority prefixed to every generated link
    /// * `paging` - Page size policy
    ///
    /// # Errors
    /// `Configuration` when the property mappings are inconsistent
    pub fn new(
        repo: Arc<dyn LibraryRepository>,
        base_url: &str,
        paging: PagingPolicy,
    ) -> AppResult<Self> {
        let mappings = property_mappings()?;
        Ok(Self {
            services: Services::new(repo, mappings),
            links: LinkBuilder::new(Arc::new(route_table(base_url))),
            paging,
        })
    }
}
