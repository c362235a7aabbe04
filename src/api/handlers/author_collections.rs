//! Author collection handlers: several authors created or fetched at once.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::AUTHOR_COLLECTION_TAG;
use crate::api::dto::{AuthorCollectionForCreation, AuthorDto, AuthorForCreation, Linked};
use crate::api::handlers::authors::author_links;
use crate::api::routes::names::GET_AUTHOR_COLLECTION;
use crate::error::{AppError, AppResult};
use crate::query::{LinkBuilder, QueryResult, RouteParams};
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Creates author collection routes.
///
/// Routes:
/// - POST /authorcollections         - Create several authors
/// - GET /authorcollections/(ids)    - Get authors by a parenthesized id list
pub fn author_collection_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_author_collection))
        .routes(routes!(get_author_collection))
}

/// Parses `(id1,id2,...)`; the parentheses are optional.
fn parse_ids(raw: &str) -> AppResult<Vec<Uuid>> {
    let inner = raw.trim();
    let inner = inner
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(inner);

    let ids = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| AppError::BadRequest {
                message: format!("'{}' is not a valid author id", s),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(AppError::BadRequest {
            message: "At least one author id is required".to_string(),
        });
    }
    Ok(ids)
}

fn with_links(links: &LinkBuilder, authors: Vec<AuthorDto>) -> QueryResult<Vec<Linked<AuthorDto>>> {
    authors
        .into_iter()
        .map(|author| -> QueryResult<Linked<AuthorDto>> {
            let author_links = author_links(links, author.id, None)?;
            Ok(Linked::new(author, author_links))
        })
        .collect()
}

/// POST /api/authorcollections - Create several authors
///
/// Returns 201 Created; `Location` addresses the whole collection.
#[utoipa::path(
    post,
    path = "/authorcollections",
    tag = AUTHOR_COLLECTION_TAG,
    request_body = Vec<AuthorForCreation>,
    responses(
        (status = 201, description = "Authors created", body = Vec<AuthorDto>),
        (status = 400, description = "Invalid request")
    )
)]
async fn create_author_collection(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthorCollectionForCreation>,
) -> AppResult<impl IntoResponse> {
    let new_authors = payload.authors.into_iter().map(Into::into).collect();
    let authors = state.services.authors.create_authors(new_authors).await?;

    let ids = authors
        .iter()
        .map(|a| a.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let location = state
        .links
        .href(GET_AUTHOR_COLLECTION, &RouteParams::new().with("ids", ids))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(with_links(&state.links, authors)?),
    ))
}

/// GET /api/authorcollections/(ids) - Get authors by id
///
/// Returns the authors in the order their ids were given.
#[utoipa::path(
    get,
    path = "/authorcollections/{ids}",
    tag = AUTHOR_COLLECTION_TAG,
    params(
        ("ids" = String, Path, description = "Parenthesized, comma separated author ids", example = "(25320c5e-f58a-4b1f-b63a-8ee07a840bdf)")
    ),
    responses(
        (status = 200, description = "Authors found", body = Vec<AuthorDto>),
        (status = 400, description = "Malformed id list"),
        (status = 404, description = "An author was not found")
    )
)]
async fn get_author_collection(
    State(state): State<AppState>,
    Path(ids): Path<String>,
) -> AppResult<Json<Vec<Linked<AuthorDto>>>> {
    let ids = parse_ids(&ids)?;
    let authors = state.services.authors.get_authors_by_ids(&ids).await?;
    Ok(Json(with_links(&state.links, authors)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::tests::{json_body, send, test_router};
    use axum::http::Method;
    use serde_json::json;

    const KING: &str = "25320c5e-f58a-4b1f-b63a-8ee07a840bdf";
    const GAIMAN: &str = "412c3012-d891-4f5e-9613-ff7aa63e6bb3";

    #[test]
    fn test_parse_ids() {
        let ids = parse_ids(&format!("({}, {})", KING, GAIMAN)).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].to_string(), KING);
        assert_eq!(parse_ids(KING).unwrap().len(), 1);

        assert!(matches!(parse_ids("()"), Err(AppError::BadRequest { .. })));
        assert!(matches!(parse_ids("(1,2)"), Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_get_collection_in_request_order() {
        let uri = format!("/api/authorcollections/({},{})", GAIMAN, KING);
        let response = send(test_router(), Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["name"], "Neil Gaiman");
        assert_eq!(body[1]["name"], "Stephen King");
        assert_eq!(body[1]["links"][0]["rel"], "self");
    }

    #[tokio::test]
    async fn test_get_collection_missing_author() {
        let uri = format!("/api/authorcollections/({},{})", KING, Uuid::new_v4());
        let response = send(test_router(), Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_collection_then_fetch_location() {
        let router = test_router();
        let payload = json!([
            { "firstName": "Ursula", "lastName": "Le Guin", "dateOfBirth": "1929-10-21", "genre": "Fantasy" },
            { "firstName": "Iain", "lastName": "Banks", "dateOfBirth": "1954-02-16", "genre": "Science Fiction" }
        ]);
        let response = send(router.clone(), Method::POST, "/api/authorcollections", Some(payload)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert!(location.starts_with("http://localhost:3000/api/authorcollections/("));
        let created = json_body(response).await;
        assert_eq!(created.as_array().unwrap().len(), 2);

        let path = location.trim_start_matches("http://localhost:3000");
        let response = send(router, Method::GET, path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = json_body(response).await;
        assert_eq!(fetched[0]["name"], "Ursula Le Guin");
        assert_eq!(fetched[1]["name"], "Iain Banks");
    }

    #[tokio::test]
    async fn test_create_empty_collection_is_rejected() {
        let response = send(test_router(), Method::POST, "/api/authorcollections", Some(json!([]))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
