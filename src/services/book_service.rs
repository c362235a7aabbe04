//! Book service: books scoped to their author.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::api::dto::{BookContent, BookDto, BookForCreation, BookForUpdate, PatchOperation};
use crate::error::{AppError, AppResult};
use crate::repositories::LibraryRepository;

/// Result of a PUT or PATCH that may create the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(BookDto),
    Updated,
}

/// Book service for handling book-related business logic.
#[derive(Clone)]
pub struct BookService {
    repo: Arc<dyn LibraryRepository>,
}

impl BookService {
    pub fn new(repo: Arc<dyn LibraryRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_author(&self, author_id: Uuid) -> AppResult<()> {
        if self.repo.author_exists(author_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Author", "id", author_id))
        }
    }

    /// Lists an author's books ordered by title.
    pub async fn list_books(&self, author_id: Uuid) -> AppResult<Vec<BookDto>> {
        self.ensure_author(author_id).await?;
        let books = self.repo.books_for_author(author_id).await?;
        Ok(books.iter().map(BookDto::from).collect())
    }

    /// Gets one of an author's books.
    pub async fn get_book(&self, author_id: Uuid, id: Uuid) -> AppResult<BookDto> {
        self.ensure_author(author_id).await?;
        self.repo
            .find_book(author_id, id)
            .await?
            .map(|book| BookDto::from(&book))
            .ok_or_else(|| AppError::not_found("Book", "id", id))
    }

    /// Creates a book with a server-assigned id.
    ///
    /// # Arguments
    /// * `input` - Already validated field by field
    pub async fn create_book(&self, author_id: Uuid, input: BookForCreation) -> AppResult<BookDto> {
        input.ensure_title_differs()?;
        self.ensure_author(author_id).await?;
        let book = self.repo.add_book(author_id, None, input.into()).await?;
        tracing::info!(author_id = %author_id, book_id = %book.id, "Book created");
        Ok(BookDto::from(&book))
    }

    /// Replaces a book, or creates it at `id` when it does not exist.
    pub async fn upsert_book(
        &self,
        author_id: Uuid,
        id: Uuid,
        input: BookForUpdate,
    ) -> AppResult<UpsertOutcome> {
        input.ensure_title_differs()?;
        self.ensure_author(author_id).await?;
        self.store(author_id, id, input).await
    }

    /// Applies a JSON Patch to a book, or to an empty book created at `id`.
    ///
    /// The patched result is validated like a full update.
    pub async fn patch_book(
        &self,
        author_id: Uuid,
        id: Uuid,
        operations: &[PatchOperation],
    ) -> AppResult<UpsertOutcome> {
        self.ensure_author(author_id).await?;
        let mut patched = match self.repo.find_book(author_id, id).await? {
            Some(book) => BookForUpdate::from(&book),
            None => BookForUpdate::default(),
        };
        patched.apply_patch(operations)?;
        patched.validate()?;
        patched.ensure_title_differs()?;
        self.store(author_id, id, patched).await
    }

    async fn store(&self, author_id: Uuid, id: Uuid, input: BookForUpdate) -> AppResult<UpsertOutcome> {
        match self.repo.find_book(author_id, id).await? {
            Some(mut book) => {
                book.title = input.title;
                book.description = input.description;
                self.repo.update_book(book).await?;
                tracing::info!(author_id = %author_id, book_id = %id, "Book updated");
                Ok(UpsertOutcome::Updated)
            }
            None => {
                let book = self.repo.add_book(author_id, Some(id), input.into()).await?;
                tracing::info!(author_id = %author_id, book_id = %id, "Book created by upsert");
                Ok(UpsertOutcome::Created(BookDto::from(&book)))
            }
        }
    }

    /// Deletes one of an author's books.
    pub async fn delete_book(&self, author_id: Uuid, id: Uuid) -> AppResult<()> {
        self.ensure_author(author_id).await?;
        if !self.repo.delete_book(author_id, id).await? {
            return Err(AppError::not_found("Book", "id", id));
        }
        tracing::info!(author_id = %author_id, book_id = %id, "Book deleted");
        Ok(())
    }
}
