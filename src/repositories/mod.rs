//! Repository layer for data access operations.
//!
//! [`LibraryRepository`] is the data source the query pipeline pages and
//! sorts through. [`InMemoryLibraryRepository`] backs it with concurrent
//! maps and can be seeded with sample data at startup.

mod library_repo;
mod memory;
mod seed;

pub use library_repo::LibraryRepository;
pub use memory::InMemoryLibraryRepository;
pub use seed::seed_library;
