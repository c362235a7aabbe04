use utoipa::OpenApi;

pub const AUTHOR_TAG: &str = "Authors";
pub const AUTHOR_COLLECTION_TAG: &str = "Author collections";
pub const BOOK_TAG: &str = "Books";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf",
        description = "A library api with sortable, pageable and shapeable author queries",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
            crate::query::LinkDescriptor,
            crate::query::PaginationMetadata,
        )
    ),
    tags(
        (name = AUTHOR_TAG, description = "Author query and lifecycle endpoints"),
        (name = AUTHOR_COLLECTION_TAG, description = "Batch author endpoints"),
        (name = BOOK_TAG, description = "Endpoints for the books of an author"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
