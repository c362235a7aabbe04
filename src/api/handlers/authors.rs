//! Author request handlers.
//!
//! The collection endpoint runs the full query pipeline: sort and field
//! validation, paging, shaping and link generation.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::AUTHOR_TAG;
use crate::api::dto::{
    AuthorDto, AuthorForCreation, AuthorsQueryParams, FieldsQueryParams, Linked, PAGINATION_HEADER,
};
use crate::api::routes::names::{DELETE_AUTHOR, GET_AUTHOR, GET_AUTHORS};
use crate::error::{AppError, AppResult};
use crate::query::{
    Affordance, FieldShaper, LinkBuilder, LinkDescriptor, Paginator, QueryResult, RouteParams,
    ShapedObject,
};
use crate::state::AppState;
use crate::utils::{CaseInsensitiveQuery, ValidatedJson};

const AUTHOR_AFFORDANCES: [Affordance; 1] = [Affordance::new(DELETE_AUTHOR, "delete_author", "DELETE")];

/// Creates author routes.
///
/// Routes:
/// - GET /authors         - Query authors
/// - POST /authors        - Create an author
/// - GET /authors/:author_id     - Get one author
/// - POST /authors/:author_id    - Always rejected; ids are server-assigned
/// - DELETE /authors/:author_id  - Delete an author and their books
pub fn author_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_authors))
        .routes(routes!(create_author))
        .routes(routes!(get_author))
        .routes(routes!(block_author_creation))
        .routes(routes!(delete_author))
}

/// Links of one author: `self` GET, optionally carrying `fields`, and `delete_author`.
pub(crate) fn author_links(
    links: &LinkBuilder,
    id: Uuid,
    fields: Option<&str>,
) -> QueryResult<Vec<LinkDescriptor>> {
    links.resource_links(
        GET_AUTHOR,
        &RouteParams::new().with("id", id),
        fields,
        &AUTHOR_AFFORDANCES,
    )
}

/// GET /api/authors - Query authors
///
/// Returns one page of shaped authors, each with its links. Paging metadata
/// travels in the `X-Pagination` header.
#[utoipa::path(
    get,
    path = "/authors",
    tag = AUTHOR_TAG,
    params(
        ("orderBy" = Option<String>, Query, description = "Comma separated sort keys, each optionally followed by ` desc`", example = "genre, age desc"),
        ("fields" = Option<String>, Query, description = "Comma separated fields to return", example = "id,name"),
        ("genre" = Option<String>, Query, description = "Exact genre, case-insensitive"),
        ("searchQuery" = Option<String>, Query, description = "Substring of genre, first or last name"),
        ("pageNumber" = Option<u32>, Query, description = "1-based page number"),
        ("pageSize" = Option<u32>, Query, description = "Items per page, clamped to the configured maximum"),
    ),
    responses(
        (status = 200, description = "Page of shaped authors", body = Vec<AuthorDto>,
            headers(("X-Pagination" = String, description = "JSON pagination metadata"))),
        (status = 400, description = "Unknown sort key or field, or invalid page number")
    )
)]
async fn list_authors(
    State(state): State<AppState>,
    CaseInsensitiveQuery(params): CaseInsensitiveQuery<AuthorsQueryParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_resource_query(&state.paging)?;
    let (page, selection) = state.services.authors.list_authors(&query).await?;
    let metadata = Paginator::new(&state.links, GET_AUTHORS).metadata(&page, &query)?;

    let fields = Some(query.fields());
    let body = page
        .items()
        .iter()
        .map(|author| -> QueryResult<Linked<ShapedObject>> {
            Ok(Linked::new(
                FieldShaper::shape_with(author, &selection)?,
                author_links(&state.links, author.id, fields)?,
            ))
        })
        .collect::<QueryResult<Vec<_>>>()?;

    Ok(([(PAGINATION_HEADER, metadata.to_header_value()?)], Json(body)))
}

/// GET /api/authors/:author_id - Get one author
///
/// `fields` is validated before the author is looked up.
#[utoipa::path(
    get,
    path = "/authors/{author_id}",
    tag = AUTHOR_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID"),
        ("fields" = Option<String>, Query, description = "Comma separated fields to return"),
    ),
    responses(
        (status = 200, description = "Shaped author with links", body = AuthorDto),
        (status = 400, description = "Unknown field"),
        (status = 404, description = "Author not found")
    )
)]
async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    CaseInsensitiveQuery(params): CaseInsensitiveQuery<FieldsQueryParams>,
) -> AppResult<Json<Linked<ShapedObject>>> {
    let fields = params.fields.unwrap_or_default();
    let (author, selection) = state.services.authors.get_author(id, &fields).await?;
    let shaped = FieldShaper::shape_with(&author, &selection)?;
    let links = author_links(&state.links, author.id, Some(&fields))?;
    Ok(Json(Linked::new(shaped, links)))
}

/// POST /api/authors - Create an author
///
/// Returns 201 Created with a `Location` header pointing at the new author.
#[utoipa::path(
    post,
    path = "/authors",
    tag = AUTHOR_TAG,
    request_body = AuthorForCreation,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid request")
    )
)]
async fn create_author(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthorForCreation>,
) -> AppResult<impl IntoResponse> {
    let author = state.services.authors.create_author(payload.into()).await?;
    let location = state
        .links
        .href(GET_AUTHOR, &RouteParams::new().with("id", author.id))?;
    let links = author_links(&state.links, author.id, None)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(Linked::new(author, links)),
    ))
}

/// POST /api/authors/:author_id - Create an author at a given id
///
/// Never succeeds: 409 when the author exists, 404 otherwise.
#[utoipa::path(
    post,
    path = "/authors/{author_id}",
    tag = AUTHOR_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author already exists")
    )
)]
async fn block_author_creation(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppError {
    state.services.authors.reject_creation_at(id).await
}

/// DELETE /api/authors/:author_id - Delete an author
///
/// Removes the author's books too. Returns 204 No Content on success.
#[utoipa::path(
    delete,
    path = "/authors/{author_id}",
    tag = AUTHOR_TAG,
    params(
        ("author_id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found")
    )
)]
async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.authors.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::routes::tests::{json_body, send, test_router};
    use axum::http::{header, Method, StatusCode};
    use serde_json::{json, Value};

    const KING: &str = "25320c5e-f58a-4b1f-b63a-8ee07a840bdf";

    fn pagination(response: &axum::response::Response) -> Value {
        let raw = response.headers().get("x-pagination").unwrap().to_str().unwrap();
        serde_json::from_str(raw).unwrap()
    }

    fn names(body: &Value) -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_list_first_page_defaults() {
        let response = send(test_router(), Method::GET, "/api/authors?pageSize=4", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let meta = pagination(&response);
        assert_eq!(meta["totalCount"], 6);
        assert_eq!(meta["pageSize"], 4);
        assert_eq!(meta["currentPage"], 1);
        assert_eq!(meta["totalPages"], 2);
        assert!(meta["previousPageLink"].is_null());
        assert_eq!(
            meta["nextPageLink"],
            "http://localhost:3000/api/authors?pageNumber=2&pageSize=4"
        );

        let body = json_body(response).await;
        assert_eq!(
            names(&body),
            ["Douglas Adams", "George RR Martin", "Jens Lapidus", "Neil Gaiman"]
        );
        let links = body[0]["links"].as_array().unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0]["rel"], "self");
        assert_eq!(links[1]["rel"], "delete_author");
        assert_eq!(links[1]["method"], "DELETE");
    }

    #[tokio::test]
    async fn test_list_shapes_and_keeps_parameters_in_links() {
        let response = send(
            test_router(),
            Method::GET,
            "/api/authors?FIELDS=name,id&genre=fantasy&PageSize=1&orderby=age%20desc",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let meta = pagination(&response);
        assert_eq!(meta["totalCount"], 2);
        let next = meta["nextPageLink"].as_str().unwrap();
        assert!(next.contains("orderBy=age+desc"));
        assert!(next.contains("fields=name%2Cid"));
        assert!(next.contains("genre=fantasy"));
        assert!(next.contains("pageNumber=2"));

        let body = json_body(response).await;
        let first = body[0].as_object().unwrap();
        let keys: Vec<&str> = first.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "id", "links"]);
        // "age desc" sorts by date of birth ascending: the oldest author first.
        assert_eq!(first["name"], "George RR Martin");
        let self_href = first["links"][0]["href"].as_str().unwrap();
        assert!(self_href.ends_with("?fields=name%2Cid"));
    }

    #[tokio::test]
    async fn test_list_clamps_out_of_range_page_size() {
        for (raw, expected) in [("-1", 1), ("0", 1), ("99999999999", 20)] {
            let uri = format!("/api/authors?pageSize={}", raw);
            let response = send(test_router(), Method::GET, &uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "pageSize={}", raw);
            assert_eq!(pagination(&response)["pageSize"], expected, "pageSize={}", raw);
        }
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_sort_key() {
        let response = send(test_router(), Method::GET, "/api/authors?orderBy=shoeSize", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "UNKNOWN_SORT_KEY");
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_field() {
        let response = send(test_router(), Method::GET, "/api/authors?fields=id,isbn", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "UNKNOWN_FIELD");
    }

    #[tokio::test]
    async fn test_list_rejects_page_zero() {
        let response = send(test_router(), Method::GET, "/api/authors?pageNumber=0", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["details"]["field"], "pageNumber");
    }

    #[tokio::test]
    async fn test_get_author_shaped() {
        let uri = format!("/api/authors/{}?fields=genre", KING);
        let response = send(test_router(), Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["genre"], "Horror");
        assert!(body.get("name").is_none());
        assert_eq!(
            body["links"][0]["href"],
            format!("http://localhost:3000/api/authors/{}?fields=genre", KING)
        );
        assert_eq!(
            body["links"][1]["href"],
            format!("http://localhost:3000/api/authors/{}", KING)
        );
    }

    #[tokio::test]
    async fn test_get_author_unknown_field_before_lookup() {
        let uri = format!("/api/authors/{}?fields=shoeSize", uuid::Uuid::new_v4());
        let response = send(test_router(), Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_author_not_found() {
        let uri = format!("/api/authors/{}", uuid::Uuid::new_v4());
        let response = send(test_router(), Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_author_malformed_id() {
        let response = send(test_router(), Method::GET, "/api/authors/not-a-uuid", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_create_author() {
        let router = test_router();
        let payload = json!({
            "firstName": "Terry",
            "lastName": "Pratchett",
            "dateOfBirth": "1948-04-28",
            "genre": "Fantasy"
        });
        let response = send(router.clone(), Method::POST, "/api/authors", Some(payload)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        let body = json_body(response).await;
        assert_eq!(body["name"], "Terry Pratchett");
        assert_eq!(body["links"][0]["href"], location.as_str());

        let path = location.trim_start_matches("http://localhost:3000");
        let response = send(router, Method::GET, path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_author_validation() {
        let payload = json!({
            "firstName": "",
            "lastName": "Pratchett",
            "dateOfBirth": "1948-04-28",
            "genre": "Fantasy"
        });
        let response = send(test_router(), Method::POST, "/api/authors", Some(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], "first_name");
    }

    #[tokio::test]
    async fn test_post_to_existing_author_conflicts() {
        let uri = format!("/api/authors/{}", KING);
        let response = send(test_router(), Method::POST, &uri, None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let uri = format!("/api/authors/{}", uuid::Uuid::new_v4());
        let response = send(test_router(), Method::POST, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_author() {
        let router = test_router();
        let uri = format!("/api/authors/{}", KING);
        let response = send(router.clone(), Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(router.clone(), Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = send(router, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
