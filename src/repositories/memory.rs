//! In-memory library storage.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Author, AuthorFilter, Book, NewAuthor, NewBook};
use crate::query::{sort, SortClause};
use crate::repositories::LibraryRepository;

/// Library repository over concurrent hash maps.
#[derive(Debug, Default)]
pub struct InMemoryLibraryRepository {
    authors: DashMap<Uuid, Author>,
    books: DashMap<Uuid, Book>,
}

impl InMemoryLibraryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts stored rows as they are, keeping their ids.
    pub fn with_data(authors: Vec<Author>, books: Vec<Book>) -> Self {
        let repo = Self::new();
        for author in authors {
            repo.authors.insert(author.id, author);
        }
        for book in books {
            repo.books.insert(book.id, book);
        }
        repo
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }
}

#[async_trait]
impl LibraryRepository for InMemoryLibraryRepository {
    async fn query_authors(
        &self,
        filter: &AuthorFilter,
        order: &[SortClause],
        skip: u64,
        take: u32,
    ) -> AppResult<(Vec<Author>, u64)> {
        let mut matching: Vec<Author> = self
            .authors
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        // Map iteration order is arbitrary; start from id order so equal keys page stably.
        matching.sort_by_key(|author| author.id);
        sort::sort_by_terms(&mut matching, order)?;

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(take as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.authors.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_authors(&self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.authors.get(id).map(|entry| entry.value().clone()))
            .collect())
    }

    async fn author_exists(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.authors.contains_key(&id))
    }

    async fn add_author(&self, author: NewAuthor) -> AppResult<Author> {
        let author = Author::from_new(Uuid::new_v4(), author);
        self.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn add_authors(&self, authors: Vec<NewAuthor>) -> AppResult<Vec<Author>> {
        let created: Vec<Author> = authors
            .into_iter()
            .map(|author| Author::from_new(Uuid::new_v4(), author))
            .collect();
        for author in &created {
            self.authors.insert(author.id, author.clone());
        }
        Ok(created)
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<bool> {
        if self.authors.remove(&id).is_none() {
            return Ok(false);
        }
        self.books.retain(|_, book| book.author_id != id);
        Ok(true)
    }

    async fn books_for_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let mut books: Vec<Book> = self
            .books
            .iter()
            .filter(|entry| entry.value().author_id == author_id)
            .map(|entry| entry.value().clone())
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn find_book(&self, author_id: Uuid, book_id: Uuid) -> AppResult<Option<Book>> {
        Ok(self
            .books
            .get(&book_id)
            .filter(|entry| entry.value().author_id == author_id)
            .map(|entry| entry.value().clone()))
    }

    async fn add_book(&self, author_id: Uuid, id: Option<Uuid>, book: NewBook) -> AppResult<Book> {
        if !self.authors.contains_key(&author_id) {
            return Err(AppError::not_found("Author", "id", author_id));
        }
        let id = id.unwrap_or_else(Uuid::new_v4);
        if self.books.contains_key(&id) {
            return Err(AppError::Duplicate {
                entity: "Book".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            });
        }
        let book = Book::from_new(id, author_id, book);
        self.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, book: Book) -> AppResult<Book> {
        match self.books.get_mut(&book.id) {
            Some(mut entry) if entry.author_id == book.author_id => {
                *entry = book.clone();
                Ok(book)
            }
            _ => Err(AppError::not_found("Book", "id", book.id)),
        }
    }

    async fn delete_book(&self, author_id: Uuid, book_id: Uuid) -> AppResult<bool> {
        Ok(self
            .books
            .remove_if(&book_id, |_, book| book.author_id == author_id)
            .is_some())
    }
}
