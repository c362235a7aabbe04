//! Request extractors that validate or normalize their input.

use axum::extract::{FromRequest, FromRequestParts, Json, Query, Request};
use axum::http::request::Parts;
use axum::http::Uri;
use serde::de::DeserializeOwned;
use url::form_urlencoded;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// JSON body that has passed `validator` checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string deserialized with parameter names lowercased.
///
/// `T` declares its fields with lowercase names, so `?PageNumber=2`,
/// `?pagenumber=2` and `?pageNumber=2` all fill the same field.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for CaseInsensitiveQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> AppResult<Self> {
        let raw = parts.uri.query().unwrap_or_default();
        let normalized = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(
                form_urlencoded::parse(raw.as_bytes()).map(|(k, v)| (k.to_lowercase(), v)),
            )
            .finish();

        let uri: Uri = format!("/?{}", normalized)
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| AppError::BadRequest {
                message: e.to_string(),
            })?;
        let Query(value) = Query::<T>::try_from_uri(&uri)?;
        Ok(CaseInsensitiveQuery(value))
    }
}
