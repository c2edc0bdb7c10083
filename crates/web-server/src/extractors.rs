//! Path extractors for the entity routes.
//!
//! A path segment that is not an integer cannot name any record, so it is
//! answered with 404 rather than a parsing error.

use crate::error::AppError;
use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use core_types::SessionKey;

const NOT_FOUND: &str = "Resource not found";

/// `/members/:id`
pub struct MemberId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for MemberId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<i32> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound(NOT_FOUND.to_string()))?;
        Ok(Self(id))
    }
}

/// `/workoutsessions/:session_id/:member_id`
pub struct SessionKeyPath(pub SessionKey);

#[async_trait]
impl<S> FromRequestParts<S> for SessionKeyPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((session_id, member_id)): Path<(i32, i32)> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::NotFound(NOT_FOUND.to_string()))?;
        Ok(Self(SessionKey::new(session_id, member_id)))
    }
}
