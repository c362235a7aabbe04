//! Router configuration for the API.
//!
//! This module provides centralized route registration, the named route
//! templates used for link generation, and middleware configuration.

use axum::{http::StatusCode, middleware, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::query::RouteTable;
use crate::state::AppState;

/// Route names resolved by the link builder.
pub mod names {
    pub const GET_AUTHORS: &str = "GetAuthors";
    pub const GET_AUTHOR: &str = "GetAuthor";
    pub const DELETE_AUTHOR: &str = "DeleteAuthor";
    pub const GET_AUTHOR_COLLECTION: &str = "GetAuthorCollection";
    pub const GET_BOOKS_FOR_AUTHOR: &str = "GetBooksForAuthor";
    pub const GET_BOOK_FOR_AUTHOR: &str = "GetBookForAuthor";
    pub const DELETE_BOOK_FOR_AUTHOR: &str = "DeleteBookForAuthor";
    pub const UPDATE_BOOK_FOR_AUTHOR: &str = "UpdateBookForAuthor";
    pub const PARTIALLY_UPDATE_BOOK_FOR_AUTHOR: &str = "PartiallyUpdateBookForAuthor";
}

/// Named templates of every linkable route, rooted at `base_url`.
pub fn route_table(base_url: &str) -> RouteTable {
    use names::*;

    RouteTable::new(base_url)
        .route(GET_AUTHORS, "/api/authors")
        .route(GET_AUTHOR, "/api/authors/{id}")
        .route(DELETE_AUTHOR, "/api/authors/{id}")
        .route(GET_AUTHOR_COLLECTION, "/api/authorcollections/({ids})")
        .route(GET_BOOKS_FOR_AUTHOR, "/api/authors/{authorId}/books")
        .route(GET_BOOK_FOR_AUTHOR, "/api/authors/{authorId}/books/{id}")
        .route(DELETE_BOOK_FOR_AUTHOR, "/api/authors/{authorId}/books/{id}")
        .route(UPDATE_BOOK_FOR_AUTHOR, "/api/authors/{authorId}/books/{id}")
        .route(PARTIALLY_UPDATE_BOOK_FOR_AUTHOR, "/api/authors/{authorId}/books/{id}")
}

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware - generates/propagates request IDs
/// 2. Logging middleware - logs requests with request IDs
/// 3. Global error handler - normalizes error bodies and attaches the request ID
///
/// CORS and compression wrap all of them, so error bodies are rewritten
/// before they are compressed.
///
/// # Routes
/// - `/api/authors` - Author queries and lifecycle
/// - `/api/authorcollections` - Batch creation and retrieval of authors
/// - `/api/authors/{author_id}/books` - Books of an author
/// - `/health` - Health check
/// - `/swagger-ui` - OpenAPI document browser
pub fn create_router(state: AppState) -> Router {
    let api_routes = OpenApiRouter::new()
        .merge(handlers::authors::author_routes())
        .merge(handlers::author_collections::author_collection_routes())
        .merge(handlers::books::book_routes());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}
