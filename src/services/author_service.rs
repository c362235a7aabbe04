//! Author service: collection queries and author lifecycle.

use std::sync::Arc;

use jiff::civil::Date;
use uuid::Uuid;

use crate::api::dto::AuthorDto;
use crate::error::{AppError, AppResult};
use crate::models::{Author, AuthorFilter, NewAuthor};
use crate::query::{FieldSelection, MappingRegistry, PagedList, ResourceQuery, SortTranslator};
use crate::repositories::LibraryRepository;

/// Sort applied when a request has no `orderBy`.
pub const DEFAULT_AUTHOR_ORDER: &str = "Name";

fn today() -> Date {
    jiff::Zoned::now().date()
}

/// Author service for handling author-related business logic.
#[derive(Clone)]
pub struct AuthorService {
    repo: Arc<dyn LibraryRepository>,
    mappings: MappingRegistry,
}

impl AuthorService {
    pub fn new(repo: Arc<dyn LibraryRepository>, mappings: MappingRegistry) -> Self {
        Self { repo, mappings }
    }

    /// Lists one page of authors.
    ///
    /// `orderBy` is validated against the author mapping and `fields`
    /// against the AuthorDto field table, both before the repository is
    /// queried.
    ///
    /// # Returns
    /// The page of authors and the resolved field selection to shape them with
    pub async fn list_authors(
        &self,
        query: &ResourceQuery,
    ) -> AppResult<(PagedList<AuthorDto>, FieldSelection)> {
        let table = self.mappings.lookup::<AuthorDto, Author>()?;
        let order_by = query.order_by_or(DEFAULT_AUTHOR_ORDER);
        table
            .check_sort_keys(order_by)
            .inspect_err(|e| tracing::warn!(order_by = %order_by, error = %e, "Rejected sort specification"))?;
        let terms = SortTranslator::new(table).translate(order_by)?;
        let selection = parse_fields(query.fields())?;

        let filter = AuthorFilter {
            genre: query.filter("genre").map(str::to_string),
            search_query: query.filter("searchQuery").map(str::to_string),
        };
        let (authors, total) = self
            .repo
            .query_authors(&filter, &terms, query.page.skip(), query.page.take())
            .await?;

        let today = today();
        let dtos = authors
            .iter()
            .map(|author| AuthorDto::from_author(author, today))
            .collect();
        Ok((PagedList::new(dtos, total, query.page), selection))
    }

    /// Gets one author, validating `fields` before the lookup.
    ///
    /// # Returns
    /// The author and the field selection, or `NotFound`
    pub async fn get_author(&self, id: Uuid, fields: &str) -> AppResult<(AuthorDto, FieldSelection)> {
        let selection = parse_fields(fields)?;
        let author = self
            .repo
            .find_author(id)
            .await?
            .ok_or_else(|| AppError::not_found("Author", "id", id))?;
        Ok((AuthorDto::from_author(&author, today()), selection))
    }

    /// Creates an author with a server-assigned id.
    pub async fn create_author(&self, new_author: NewAuthor) -> AppResult<AuthorDto> {
        let author = self.repo.add_author(new_author).await?;
        tracing::info!(author_id = %author.id, "Author created");
        Ok(AuthorDto::from_author(&author, today()))
    }

    /// Creates several authors at once.
    pub async fn create_authors(&self, new_authors: Vec<NewAuthor>) -> AppResult<Vec<AuthorDto>> {
        let authors = self.repo.add_authors(new_authors).await?;
        tracing::info!(count = authors.len(), "Author collection created");
        let today = today();
        Ok(authors
            .iter()
            .map(|author| AuthorDto::from_author(author, today))
            .collect())
    }

    /// Gets the authors with the given ids, in request order.
    ///
    /// # Returns
    /// `NotFound` naming the first missing id when any is unknown
    pub async fn get_authors_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<AuthorDto>> {
        let authors = self.repo.find_authors(ids).await?;
        if authors.len() != ids.len() {
            let missing = ids
                .iter()
                .find(|id| !authors.iter().any(|a| a.id == **id))
                .map(Uuid::to_string)
                .unwrap_or_default();
            return Err(AppError::not_found("Author", "id", missing));
        }
        let today = today();
        Ok(authors
            .iter()
            .map(|author| AuthorDto::from_author(author, today))
            .collect())
    }

    /// Rejects creating an author at a client-chosen id.
    ///
    /// # Returns
    /// `Duplicate` when the author exists, `NotFound` otherwise
    pub async fn reject_creation_at(&self, id: Uuid) -> AppError {
        match self.repo.author_exists(id).await {
            Ok(true) => AppError::Duplicate {
                entity: "Author".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            },
            Ok(false) => AppError::not_found("Author", "id", id),
            Err(e) => e,
        }
    }

    /// Deletes an author and their books.
    pub async fn delete_author(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete_author(id).await? {
            return Err(AppError::not_found("Author", "id", id));
        }
        tracing::info!(author_id = %id, "Author deleted");
        Ok(())
    }
}

fn parse_fields(fields: &str) -> AppResult<FieldSelection> {
    FieldSelection::parse::<AuthorDto>(fields)
        .inspect_err(|e| tracing::warn!(fields = %fields, error = %e, "Rejected field selection"))
        .map_err(AppError::from)
}
