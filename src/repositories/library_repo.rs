use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Author, AuthorFilter, Book, NewAuthor, NewBook};
use crate::query::SortClause;

/// Data access for authors and their books.
///
/// Ordering arrives already translated to physical properties; callers
/// validate everything before reaching the repository.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Filters, orders and pages authors.
    ///
    /// # Returns
    /// The requested page and the number of authors matching `filter`
    async fn query_authors(
        &self,
        filter: &AuthorFilter,
        order: &[SortClause],
        skip: u64,
        take: u32,
    ) -> AppResult<(Vec<Author>, u64)>;

    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>>;

    /// Authors with the given ids, in the order of `ids`. Missing ids are skipped.
    async fn find_authors(&self, ids: &[Uuid]) -> AppResult<Vec<Author>>;

    async fn author_exists(&self, id: Uuid) -> AppResult<bool>;

    async fn add_author(&self, author: NewAuthor) -> AppResult<Author>;

    /// Adds all authors or none.
    async fn add_authors(&self, authors: Vec<NewAuthor>) -> AppResult<Vec<Author>>;

    /// Removes an author together with their books.
    ///
    /// # Returns
    /// `false` when no such author exists
    async fn delete_author(&self, id: Uuid) -> AppResult<bool>;

    /// An author's books ordered by title.
    async fn books_for_author(&self, author_id: Uuid) -> AppResult<Vec<Book>>;

    async fn find_book(&self, author_id: Uuid, book_id: Uuid) -> AppResult<Option<Book>>;

    /// Adds a book under `author_id`, with `id` when given, otherwise a fresh one.
    async fn add_book(&self, author_id: Uuid, id: Option<Uuid>, book: NewBook) -> AppResult<Book>;

    /// Replaces a stored book with the same id and author.
    async fn update_book(&self, book: Book) -> AppResult<Book>;

    /// # Returns
    /// `false` when the author has no book with this id
    async fn delete_book(&self, author_id: Uuid, book_id: Uuid) -> AppResult<bool>;
}
