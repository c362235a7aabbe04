//! Error handler for converting AppError to HTTP responses.
//!
//! This module implements the IntoResponse trait for AppError,
//! providing consistent error response formatting across the API.
//! Includes status code mapping, error message sanitization,
//! and request ID propagation for correlation.

use axum::{
    body::Body,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::api::dto::ErrorResponse;
use crate::api::middleware::RequestId;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate → 409 CONFLICT
    /// - Validation, ValidationErrors → 400 BAD_REQUEST
    /// - UnknownSortKey, UnknownField → 400 BAD_REQUEST
    /// - BadRequest → 400 BAD_REQUEST
    /// - UnprocessableContent → 422 UNPROCESSABLE_ENTITY
    /// - Configuration → 500 INTERNAL_SERVER_ERROR
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }
        (status, Json(error_to_body(&self))).into_response()
    }
}

/// Builds the sanitized response body for an error.
///
/// Server-side failures never expose their source chain.
pub fn error_to_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::NotFound { entity, field, value } => {
            ErrorResponse::not_found_error(entity, field, value)
        }
        AppError::Duplicate { entity, field, value } => {
            ErrorResponse::duplicate_error(entity, field, value)
        }
        AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new(code, "Request validation failed").with_details(json!(errors))
        }
        AppError::UnknownSortKey { name } => ErrorResponse::new(
            code,
            &format!("The sort key '{}' is not supported by this resource", name),
        )
        .with_details(json!({ "orderBy": name })),
        AppError::UnknownField { name } => ErrorResponse::new(
            code,
            &format!("The field '{}' does not exist on this resource", name),
        )
        .with_details(json!({ "fields": name })),
        AppError::BadRequest { message } | AppError::UnprocessableContent { message } => {
            ErrorResponse::new(code, message)
        }
        AppError::Configuration { key, .. } => {
            ErrorResponse::new(code, &format!("Configuration error: {}", key))
                .with_details(json!({ "key": key }))
        }
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Global error handling middleware.
///
/// Error responses already in JSON get the request ID added to their body.
/// Anything else, such as axum's plain-text 404 and 405 responses, is
/// replaced by the standard ErrorResponse.
pub async fn global_error_handler(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|id| id.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    let (mut parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let mut error_body = match serde_json::from_slice::<Value>(&body_bytes) {
        Ok(value @ Value::Object(_)) if is_json => value,
        _ => {
            let original = String::from_utf8_lossy(&body_bytes).trim().to_string();
            let message = if original.is_empty() {
                default_message(status).to_string()
            } else {
                original
            };
            json!(ErrorResponse::new(status_code_name(status), &message))
        }
    };

    if let (Some(id), Value::Object(map)) = (request_id, &mut error_body) {
        map.entry("request_id").or_insert(Value::String(id));
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Response::from_parts(parts, Body::from(error_body.to_string()))
}

fn status_code_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_CONTENT",
        StatusCode::REQUEST_TIMEOUT => "REQUEST_TIMEOUT",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::INTERNAL_SERVER_ERROR => "INTERNAL_SERVER_ERROR",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        _ => "UNKNOWN_ERROR",
    }
}

fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "The requested resource was not found",
        StatusCode::METHOD_NOT_ALLOWED => "HTTP method not allowed for this endpoint",
        StatusCode::REQUEST_TIMEOUT => "Request timeout",
        _ => status.canonical_reason().unwrap_or("An unknown error occurred"),
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::UnknownSortKey { .. } => StatusCode::BAD_REQUEST,
        AppError::UnknownField { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::UnprocessableContent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::UnknownSortKey { .. } => "UNKNOWN_SORT_KEY",
        AppError::UnknownField { .. } => "UNKNOWN_FIELD",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::UnprocessableContent { .. } => "UNPROCESSABLE_CONTENT",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn test_not_found_status_code() {
        let error = AppError::not_found("Author", "id", 123);
        assert_eq!(error_to_status_code(&error), StatusCode::NOT_FOUND);
        assert_eq!(error_to_code(&error), "NOT_FOUND");
    }

    #[test]
    fn test_duplicate_status_code() {
        let error = AppError::Duplicate {
            entity: "Author".to_string(),
            field: "id".to_string(),
            value: "1".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::CONFLICT);
        assert_eq!(error_to_code(&error), "DUPLICATE_ENTRY");
    }

    #[test]
    fn test_query_errors_are_client_errors() {
        let error = AppError::UnknownSortKey {
            name: "title".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_code(&error), "UNKNOWN_SORT_KEY");

        let error = AppError::UnknownField {
            name: "isbn".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_code(&error), "UNKNOWN_FIELD");
        assert_eq!(error_to_body(&error).details.unwrap()["fields"], "isbn");
    }

    #[test]
    fn test_validation_errors_body() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "title".to_string(),
                message: "Title is required".to_string(),
            }],
        };
        let body = error_to_body(&error);
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.details.unwrap()[0]["field"], "title");
    }

    #[test]
    fn test_unprocessable_content_status_code() {
        let error = AppError::UnprocessableContent {
            message: "Cannot process request".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_to_code(&error), "UNPROCESSABLE_CONTENT");
    }

    #[test]
    fn test_internal_error_sanitization() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("Panic with stack trace and sensitive data"),
        };
        let body = error_to_body(&error);
        assert_eq!(body.message, "An internal error occurred");
        assert!(body.details.is_none());
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_json_rejection_is_bad_request() {
        use axum::extract::rejection::MissingJsonContentType;

        let rejection = JsonRejection::MissingJsonContentType(MissingJsonContentType::default());
        let error = AppError::from(rejection);
        assert!(matches!(error, AppError::BadRequest { .. }));
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app() -> Router {
        Router::new()
            .route("/missing", get(|| async { AppError::not_found("Author", "id", 1) }))
            .route("/plain", get(|| async { (StatusCode::BAD_REQUEST, "broken input") }))
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(crate::api::middleware::request_id_middleware))
    }

    #[tokio::test]
    async fn test_global_error_handler_adds_request_id() {
        let request = axum::http::Request::builder()
            .uri("/missing")
            .header("x-request-id", "req-1")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["request_id"], "req-1");
    }

    #[tokio::test]
    async fn test_global_error_handler_wraps_plain_text() {
        let request = axum::http::Request::builder()
            .uri("/plain")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "broken input");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_global_error_handler_unknown_route() {
        let request = axum::http::Request::builder()
            .uri("/nowhere")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }
}
