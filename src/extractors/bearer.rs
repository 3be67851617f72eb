//! Extract the bearer token from the `Authorization` header.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Bearer token from `Authorization: Bearer <token>`. Empty when the header is
/// missing or malformed; the service rejects it as unauthenticated.
#[derive(Clone, Debug, Default)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        Ok(BearerToken(token))
    }
}
