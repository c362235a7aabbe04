//! Author DTOs for API requests and responses.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::page_request;
use crate::error::AppResult;
use crate::models::{Author, NewAuthor};
use crate::query::{PagingPolicy, ResourceQuery, Shape};

/// Author as returned to clients; the shape `fields` selects from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Shape)]
#[serde(rename_all = "camelCase")]
#[shape(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    /// First and last name
    #[schema(example = "Stephen King")]
    pub name: String,
    /// Whole years since the date of birth
    #[schema(example = 77)]
    pub age: i32,
    #[schema(example = "Horror")]
    pub genre: String,
}

impl AuthorDto {
    pub fn from_author(author: &Author, today: Date) -> Self {
        Self {
            id: author.id,
            name: author.full_name(),
            age: author.age_on(today),
            genre: author.genre.clone(),
        }
    }
}

/// Request body for creating an author.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForCreation {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    #[schema(example = "Stephen")]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    #[schema(example = "King")]
    pub last_name: String,

    #[schema(value_type = String, format = Date, example = "1947-09-21")]
    pub date_of_birth: Date,

    #[validate(length(min = 1, max = 50, message = "Genre must be between 1 and 50 characters"))]
    #[schema(example = "Horror")]
    pub genre: String,
}

impl From<AuthorForCreation> for NewAuthor {
    fn from(dto: AuthorForCreation) -> Self {
        NewAuthor {
            first_name: dto.first_name,
            last_name: dto.last_name,
            date_of_birth: dto.date_of_birth,
            genre: dto.genre,
        }
    }
}

/// A batch of authors created in one request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(transparent)]
pub struct AuthorCollectionForCreation {
    #[validate(length(min = 1, message = "At least one author is required"), nested)]
    pub authors: Vec<AuthorForCreation>,
}

/// Query parameters of `GET /api/authors`.
///
/// Keys arrive lowercased, see `CaseInsensitiveQuery`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorsQueryParams {
    #[serde(rename = "orderby")]
    pub order_by: Option<String>,
    pub fields: Option<String>,
    pub genre: Option<String>,
    #[serde(rename = "searchquery")]
    pub search_query: Option<String>,
    #[serde(rename = "pagenumber")]
    pub page_number: Option<u32>,
    #[serde(rename = "pagesize")]
    pub page_size: Option<i64>,
}

impl AuthorsQueryParams {
    /// Normalizes the parameters. Fails when the page number is below 1.
    pub fn into_resource_query(self, policy: &PagingPolicy) -> AppResult<ResourceQuery> {
        let page = page_request(policy, self.page_number, self.page_size)?;
        Ok(ResourceQuery::new(page)
            .with_order_by(self.order_by)
            .with_fields(self.fields)
            .with_filter("genre", self.genre)
            .with_filter("searchQuery", self.search_query))
    }
}

/// Query parameters of single-resource GETs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldsQueryParams {
    pub fields: Option<String>,
}
