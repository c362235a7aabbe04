//! Logging middleware for request/response tracing.
//!
//! Each request runs inside an `http_request` span carrying the method,
//! path and request ID, so logs emitted by handlers and the query pipeline
//! are correlated with the request that caused them.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};

use super::RequestId;

/// Middleware that logs request and response information.
///
/// # Logged Information
/// - Request: HTTP method, path, query string, request ID
/// - Response: status code, duration in milliseconds
///
/// Responses with a 5xx status are logged at `warn`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let span = info_span!(
        "http_request",
        method = %method,
        path = %uri.path(),
        request_id = %request_id
    );

    async move {
        info!(query = uri.query().unwrap_or(""), "Request received");

        let start = Instant::now();
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis();
        let status = response.status().as_u16();

        if response.status().is_server_error() {
            warn!(status = status, duration_ms = %duration_ms, "Response sent");
        } else {
            info!(status = status, duration_ms = %duration_ms, "Response sent");
        }
        response
    }
    .instrument(span)
    .await
}
