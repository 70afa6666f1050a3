//! Pagination extractor
//!
//! Extracts offset pagination (`skip`, `limit`) from query strings.

use activity_core::Page;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Validated pagination; negative skips become 0, limits are clamped to 1..=100
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination(pub Page);

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Pagination(Page::new(
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(Page::DEFAULT_LIMIT),
        ))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(Pagination::from(params))
    }
}
