//! Common API types and utilities

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::error::PlatformError;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_SKIP: u32 = 0;

/// `?limit=&skip=` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Maximum number of entries to return (default 10)
    pub limit: u32,
    /// Number of entries to skip (default 0)
    pub skip: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: DEFAULT_SKIP,
        }
    }
}

impl Pagination {
    /// Parse from a raw query string. Empty values fall back to defaults.
    pub fn from_query(query: Option<&str>) -> Result<Self, PlatformError> {
        let mut pagination = Self::default();

        let Some(query) = query else {
            return Ok(pagination);
        };

        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match name.as_ref() {
                "limit" => &mut pagination.limit,
                "skip" => &mut pagination.skip,
                _ => continue,
            };
            if value.is_empty() {
                continue;
            }
            *slot = value
                .parse()
                .map_err(|_| PlatformError::bad_query_parameter(name.as_ref(), value.as_ref(), "uint"))?;
        }

        Ok(pagination)
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Pagination::from_query(parts.uri.query())
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationInfo {
    pub total_elements: u64,
    pub displayed_elements: usize,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total_elements: u64) -> Self {
        let displayed_elements = data.len();
        Self {
            data,
            pagination: PaginationInfo {
                total_elements,
                displayed_elements,
            },
        }
    }
}

/// JSON body extractor whose rejection is a structured `BadRequestBody` error.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(PlatformError::BadRequestBody {
                message: rejection.body_text(),
            }),
        }
    }
}
