//! Storage shapes of the library domain.

mod author;
mod book;

pub use author::{Author, AuthorFilter, NewAuthor};
pub use book::{Book, NewBook};
