//! Book request handlers, scoped to an author.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::BOOK_TAG;
use crate::api::dto::{BookDto, BookForCreation, BookForUpdate, Linked, LinkedCollection, PatchOperation};
use crate::api::routes::names::{
    DELETE_BOOK_FOR_AUTHOR, GET_BOOKS_FOR_AUTHOR, GET_BOOK_FOR_AUTHOR,
    PARTIALLY_UPDATE_BOOK_FOR_AUTHOR, UPDATE_BOOK_FOR_AUTHOR,
};
use crate::error::AppResult;
use crate::query::{Affordance, LinkBuilder, LinkDescriptor, QueryError, QueryResult, RouteParams};
use crate::services::UpsertOutcome;
use crate::state::AppState;
use crate::utils::ValidatedJson;

const BOOK_AFFORDANCES: [Affordance; 3] = [
    Affordance::new(DELETE_BOOK_FOR_AUTHOR, "delete_book", "DELETE"),
    Affordance::new(UPDATE_BOOK_FOR_AUTHOR, "update_book", "PUT"),
    Affordance::new(PARTIALLY_UPDATE_BOOK_FOR_AUTHOR, "partially_update_book", "PATCH"),
];

/// Creates book routes.
///
/// Routes:
/// - GET /authors/:author_id/books         - List an author's books
/// - POST /authors/:author_id/books        - Create a book
/// - GET /authors/:author_id/books/:id     - Get a book
/// - PUT /authors/:author_id/books/:id     - Replace or create a book
/// - PATCH /authors/:author_id/books/:id   - Patch or create a book
/// - DELETE /authors/:author_id/books/:id  - Delete a book
pub fn book_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_books))
        .routes(routes!(create_book))
        .routes(routes!(get_book))
        .routes(routes!(update_book))
        .routes(routes!(partially_update_book))
        .routes(routes!(delete_book))
}

fn book_params(book: &BookDto) -> RouteParams {
    RouteParams::new()
        .with("authorId", book.author_id)
        .with("id", book.id)
}

fn book_links(links: &LinkBuilder, book: &BookDto) -> QueryResult<Vec<LinkDescriptor>> {
    links.resource_links(GET_BOOK_FOR_AUTHOR, &book_params(book), None, &BOOK_AFFORDANCES)
}

/// 201 Created with `Location` and the linked book.
fn created(links: &LinkBuilder, book: BookDto) -> AppResult<Response> {
    let location = links.href(GET_BOOK_FOR_AUTHOR, &book_params(&book))?;
    let book_links = book_links(links, &book)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(Linked::new(book, book_links)),
    )
        .into_response())
}

fn upserted(links: &LinkBuilder, outcome: UpsertOutcome) -> AppResult<Response> {
    match outcome {
        UpsertOutcome::Created(book) => created(links, book),
        UpsertOutcome::Updated => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// GET /api/authors/:author_id/books - List an author's books
///
/// Returns the books ordered by title, each with its links, plus the
/// collection's own link.
#[utoipa::path(
    get,
    path = "/authors/{author_id}/books",
    tag = BOOK_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Books of the author", body = LinkedCollection),
        (status = 404, description = "Author not found")
    )
)]
async fn list_books(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> AppResult<Json<LinkedCollection>> {
    let books = state.services.books.list_books(author_id).await?;
    let value = books
        .into_iter()
        .map(|book| -> QueryResult<serde_json::Value> {
            let links = book_links(&state.links, &book)?;
            serde_json::to_value(Linked::new(book, links)).map_err(QueryError::from)
        })
        .collect::<QueryResult<Vec<_>>>()?;
    let links = vec![state.links.collection_link(
        GET_BOOKS_FOR_AUTHOR,
        &RouteParams::new().with("authorId", author_id),
    )?];
    Ok(Json(LinkedCollection { value, links }))
}

/// GET /api/authors/:author_id/books/:id - Get a book
#[utoipa::path(
    get,
    path = "/authors/{author_id}/books/{id}",
    tag = BOOK_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID"),
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book found", body = BookDto),
        (status = 404, description = "Author or book not found")
    )
)]
async fn get_book(
    State(state): State<AppState>,
    Path((author_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Linked<BookDto>>> {
    let book = state.services.books.get_book(author_id, id).await?;
    let links = book_links(&state.links, &book)?;
    Ok(Json(Linked::new(book, links)))
}

/// POST /api/authors/:author_id/books - Create a book
///
/// Returns 201 Created with a `Location` header pointing at the new book.
#[utoipa::path(
    post,
    path = "/authors/{author_id}/books",
    tag = BOOK_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID")
    ),
    request_body = BookForCreation,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Author not found"),
        (status = 422, description = "Description repeats the title")
    )
)]
async fn create_book(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<BookForCreation>,
) -> AppResult<Response> {
    let book = state.services.books.create_book(author_id, payload).await?;
    created(&state.links, book)
}

/// PUT /api/authors/:author_id/books/:id - Replace a book
///
/// Returns 204 No Content when the book existed, otherwise creates it at
/// the given id and returns 201 Created.
#[utoipa::path(
    put,
    path = "/authors/{author_id}/books/{id}",
    tag = BOOK_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID"),
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body = BookForUpdate,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 204, description = "Book updated"),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Author not found"),
        (status = 422, description = "Description repeats the title")
    )
)]
async fn update_book(
    State(state): State<AppState>,
    Path((author_id, id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<BookForUpdate>,
) -> AppResult<Response> {
    let outcome = state.services.books.upsert_book(author_id, id, payload).await?;
    upserted(&state.links, outcome)
}

/// PATCH /api/authors/:author_id/books/:id - Patch a book
///
/// Accepts a JSON Patch document over `/title` and `/description`. A missing
/// book is created from the patched empty book.
#[utoipa::path(
    patch,
    path = "/authors/{author_id}/books/{id}",
    tag = BOOK_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID"),
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body(content = Vec<PatchOperation>, content_type = "application/json-patch+json"),
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 204, description = "Book updated"),
        (status = 400, description = "Patched book is invalid"),
        (status = 404, description = "Author not found"),
        (status = 422, description = "Unsupported patch target or description repeats the title")
    )
)]
async fn partially_update_book(
    State(state): State<AppState>,
    Path((author_id, id)): Path<(Uuid, Uuid)>,
    Json(operations): Json<Vec<PatchOperation>>,
) -> AppResult<Response> {
    let outcome = state
        .services
        .books
        .patch_book(author_id, id, &operations)
        .await?;
    upserted(&state.links, outcome)
}

/// DELETE /api/authors/:author_id/books/:id - Delete a book
#[utoipa::path(
    delete,
    path = "/authors/{author_id}/books/{id}",
    tag = BOOK_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID"),
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Author or book not found")
    )
)]
async fn delete_book(
    State(state): State<AppState>,
    Path((author_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state.services.books.delete_book(author_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
