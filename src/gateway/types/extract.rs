//! Axum extractors whose rejections use the API envelope
//!
//! - `JsonBody`: request body, 415 without a JSON content type, else 400
//! - `ApiPath`: path parameters, 400 when a segment does not parse
//! - `ApiQuery`: query string, 400 when it does not deserialize

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::response::ApiError;

/// JSON body extractor.
///
/// Missing or non-JSON `Content-Type` is 415, anything else the body
/// deserializer rejects is 400.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => {
                tracing::warn!("Rejected request without JSON content type");
                Err(ApiError::unsupported_media_type(
                    "Content-Type must be application/json",
                ))
            }
            Err(rejection) => Err(ApiError::bad_request(format!(
                "Invalid JSON: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Path parameter extractor (`/orders/abc` is a 400 envelope).
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection @ PathRejection::FailedToDeserializePathParams(_)) => {
                tracing::warn!("Rejected path {}: {}", parts.uri.path(), rejection.body_text());
                Err(ApiError::bad_request(rejection.body_text()))
            }
            // Route/handler mismatch, not a client error
            Err(rejection) => {
                tracing::error!("Path extraction failed: {}", rejection.body_text());
                Err(ApiError::internal(rejection.body_text()))
            }
        }
    }
}

/// Query string extractor.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
    }
}
