//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `author` - Author shapes, creation bodies and collection query parameters
//! - `book` - Book shapes, creation/update bodies and JSON Patch operations
//! - `error` - Common error response DTOs
//! - `health` - Health check response
//! - `link` - Link-carrying wrappers
//! - `pagination` - Paging parameters and the pagination header

mod author;
mod book;
mod error;
mod health;
mod link;
pub mod pagination;

pub use author::{
    AuthorCollectionForCreation, AuthorDto, AuthorForCreation, AuthorsQueryParams,
    FieldsQueryParams,
};
pub use book::{BookContent, BookDto, BookForCreation, BookForUpdate, PatchOperation};
pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
pub use link::{Linked, LinkedCollection};
pub use pagination::PAGINATION_HEADER;
