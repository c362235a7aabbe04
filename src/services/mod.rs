//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers. Collection reads follow a validate-first
//! order: sort keys and field selections are checked before the
//! repository is queried.

mod author_service;
mod book_service;

pub use author_service::AuthorService;
pub use book_service::{BookService, UpsertOutcome};

use std::sync::Arc;

use crate::api::dto::AuthorDto;
use crate::models::Author;
use crate::query::{MappingEntry, MappingRegistry, QueryResult};
use crate::repositories::LibraryRepository;

/// Builds the logical-to-physical property mappings of every resource.
pub fn property_mappings() -> QueryResult<MappingRegistry> {
    Ok(MappingRegistry::builder()
        .register::<AuthorDto, Author>(vec![
            MappingEntry::new("Id", ["Id"]),
            MappingEntry::new("Genre", ["Genre"]),
            MappingEntry::new("Age", ["DateOfBirth"]).reversed(),
            MappingEntry::new("Name", ["FirstName", "LastName"]),
        ])?
        .build())
}

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since the repository and mappings sit behind `Arc`s.
#[derive(Clone)]
pub struct Services {
    pub authors: AuthorService,
    pub books: BookService,
}

impl Services {
    /// Creates all services over one repository.
    pub fn new(repo: Arc<dyn LibraryRepository>, mappings: MappingRegistry) -> Self {
        Self {
            authors: AuthorService::new(repo.clone(), mappings),
            books: BookService::new(repo),
        }
    }
}
