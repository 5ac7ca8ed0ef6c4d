//! Elements Admin API
//!
//! Pastes and redirects inside a namespace. `internal_data` never leaves
//! the service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::element::operations::{
    CreatePasteElementCommand, CreatePasteElementUseCase, CreateRedirectElementCommand,
    CreateRedirectElementUseCase, DeleteElementCommand, DeleteElementUseCase, ElementLimits,
    UpdateElementCommand, UpdateElementUseCase,
};
use crate::shared::api_common::{ApiJson, PaginatedResponse, Pagination};
use crate::shared::error::{ErrorResponse, PlatformError};
use crate::shared::middleware::{AdminOnly, NamespaceAccess};
use crate::{Element, ElementRepository};

/// Create paste request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePasteRequest {
    /// Requested key, generated when absent
    pub key: Option<String>,
    pub content: String,
    pub max_views: Option<i64>,
    /// Unix seconds
    pub valid_from: Option<i64>,
    /// Unix seconds
    pub valid_until: Option<i64>,
}

/// Create redirect request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRedirectRequest {
    /// Requested key, generated when absent
    pub key: Option<String>,
    /// Absolute http(s) URL
    pub target_url: String,
    pub max_views: Option<i64>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
}

/// Partial element update; absent fields are left untouched
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateElementRequest {
    /// New key
    pub key: Option<String>,
    pub max_views: Option<i64>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
}

/// Element response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ElementResponse {
    pub namespace: String,
    pub key: String,
    /// 0 = paste, 1 = redirect
    #[serde(rename = "type")]
    pub element_type: i16,
    #[schema(value_type = Object)]
    pub public_data: Map<String, Value>,
    pub views: i64,
    /// -1 means unlimited
    pub max_views: i64,
    /// Unix seconds, -1 means unbounded
    pub valid_from: i64,
    /// Unix seconds, -1 means unbounded
    pub valid_until: i64,
    pub created: i64,
}

impl From<Element> for ElementResponse {
    fn from(e: Element) -> Self {
        Self {
            namespace: e.namespace_id,
            key: e.key,
            element_type: e.element_type.code(),
            public_data: e.public_data,
            views: e.views,
            max_views: e.max_views,
            valid_from: e.valid_from,
            valid_until: e.valid_until,
            created: e.created,
        }
    }
}

/// Elements service state
#[derive(Clone)]
pub struct ElementsState {
    pub element_repo: Arc<dyn ElementRepository>,
    pub create_paste_use_case: Arc<CreatePasteElementUseCase>,
    pub create_redirect_use_case: Arc<CreateRedirectElementUseCase>,
    pub update_use_case: Arc<UpdateElementUseCase>,
    pub delete_use_case: Arc<DeleteElementUseCase>,
}

fn page_response(found: Vec<Element>, total: u64) -> Json<PaginatedResponse<ElementResponse>> {
    let data = found.into_iter().map(ElementResponse::from).collect();
    Json(PaginatedResponse::new(data, total))
}

/// List elements across all namespaces
#[utoipa::path(
    get,
    path = "",
    tag = "elements",
    params(Pagination),
    responses(
        (status = 200, description = "Page of elements", body = PaginatedResponse<ElementResponse>),
        (status = 400, description = "Bad pagination parameter", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_elements(
    State(state): State<ElementsState>,
    _admin: AdminOnly,
    pagination: Pagination,
) -> Result<Json<PaginatedResponse<ElementResponse>>, PlatformError> {
    let found = state
        .element_repo
        .find_all(pagination.limit, pagination.skip)
        .await?;
    let total = state.element_repo.count().await?;
    Ok(page_response(found, total))
}

/// List elements of a namespace
#[utoipa::path(
    get,
    path = "/{namespace_id}",
    tag = "elements",
    params(
        ("namespace_id" = String, Path, description = "Namespace ID"),
        Pagination
    ),
    responses(
        (status = 200, description = "Page of elements", body = PaginatedResponse<ElementResponse>),
        (status = 401, description = "Missing or wrong token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_namespace_elements(
    State(state): State<ElementsState>,
    access: NamespaceAccess,
    pagination: Pagination,
) -> Result<Json<PaginatedResponse<ElementResponse>>, PlatformError> {
    let namespace_id = &access.namespace.id;
    let found = state
        .element_repo
        .find_in_namespace(namespace_id, pagination.limit, pagination.skip)
        .await?;
    let total = state.element_repo.count_in_namespace(namespace_id).await?;
    Ok(page_response(found, total))
}

/// Create a paste
#[utoipa::path(
    post,
    path = "/{namespace_id}/paste",
    tag = "elements",
    params(("namespace_id" = String, Path, description = "Namespace ID")),
    request_body = CreatePasteRequest,
    responses(
        (status = 201, description = "Paste created", body = ElementResponse),
        (status = 403, description = "Namespace deactivated", body = ErrorResponse),
        (status = 409, description = "Element key in use", body = ErrorResponse),
        (status = 422, description = "Empty content or illegal key", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_paste(
    State(state): State<ElementsState>,
    access: NamespaceAccess,
    ApiJson(req): ApiJson<CreatePasteRequest>,
) -> Result<(StatusCode, Json<ElementResponse>), PlatformError> {
    let command = CreatePasteElementCommand {
        namespace_id: access.namespace.id,
        key: req.key,
        content: req.content,
        limits: ElementLimits {
            max_views: req.max_views,
            valid_from: req.valid_from,
            valid_until: req.valid_until,
        },
        is_admin: access.is_admin,
    };

    let element = state.create_paste_use_case.execute(command).await?;
    Ok((StatusCode::CREATED, Json(element.into())))
}

/// Create a redirect
#[utoipa::path(
    post,
    path = "/{namespace_id}/redirect",
    tag = "elements",
    params(("namespace_id" = String, Path, description = "Namespace ID")),
    request_body = CreateRedirectRequest,
    responses(
        (status = 201, description = "Redirect created", body = ElementResponse),
        (status = 403, description = "Namespace deactivated", body = ErrorResponse),
        (status = 409, description = "Element key in use", body = ErrorResponse),
        (status = 422, description = "Invalid target URL or illegal key", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_redirect(
    State(state): State<ElementsState>,
    access: NamespaceAccess,
    ApiJson(req): ApiJson<CreateRedirectRequest>,
) -> Result<(StatusCode, Json<ElementResponse>), PlatformError> {
    let command = CreateRedirectElementCommand {
        namespace_id: access.namespace.id,
        key: req.key,
        target_url: req.target_url,
        limits: ElementLimits {
            max_views: req.max_views,
            valid_from: req.valid_from,
            valid_until: req.valid_until,
        },
        is_admin: access.is_admin,
    };

    let element = state.create_redirect_use_case.execute(command).await?;
    Ok((StatusCode::CREATED, Json(element.into())))
}

/// Get an element
#[utoipa::path(
    get,
    path = "/{namespace_id}/{element_key}",
    tag = "elements",
    params(
        ("namespace_id" = String, Path, description = "Namespace ID"),
        ("element_key" = String, Path, description = "Element key")
    ),
    responses(
        (status = 200, description = "Element found", body = ElementResponse),
        (status = 404, description = "Element not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_element(
    State(state): State<ElementsState>,
    access: NamespaceAccess,
    Path((_namespace_id, element_key)): Path<(String, String)>,
) -> Result<Json<ElementResponse>, PlatformError> {
    let namespace_id = access.namespace.id;
    let key = element_key.to_lowercase();

    let element = state
        .element_repo
        .find(&namespace_id, &key)
        .await?
        .ok_or_else(|| PlatformError::element_not_found(namespace_id, key))?;

    Ok(Json(element.into()))
}

/// Update an element
#[utoipa::path(
    patch,
    path = "/{namespace_id}/{element_key}",
    tag = "elements",
    params(
        ("namespace_id" = String, Path, description = "Namespace ID"),
        ("element_key" = String, Path, description = "Element key")
    ),
    request_body = UpdateElementRequest,
    responses(
        (status = 200, description = "Element updated", body = ElementResponse),
        (status = 404, description = "Element not found", body = ErrorResponse),
        (status = 409, description = "New key in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_element(
    State(state): State<ElementsState>,
    access: NamespaceAccess,
    Path((_namespace_id, element_key)): Path<(String, String)>,
    ApiJson(req): ApiJson<UpdateElementRequest>,
) -> Result<Json<ElementResponse>, PlatformError> {
    let command = UpdateElementCommand {
        namespace_id: access.namespace.id,
        key: element_key,
        new_key: req.key,
        max_views: req.max_views,
        valid_from: req.valid_from,
        valid_until: req.valid_until,
    };

    let element = state.update_use_case.execute(command).await?;
    Ok(Json(element.into()))
}

/// Delete an element
#[utoipa::path(
    delete,
    path = "/{namespace_id}/{element_key}",
    tag = "elements",
    params(
        ("namespace_id" = String, Path, description = "Namespace ID"),
        ("element_key" = String, Path, description = "Element key")
    ),
    responses(
        (status = 204, description = "Element deleted"),
        (status = 404, description = "Element not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_element(
    State(state): State<ElementsState>,
    access: NamespaceAccess,
    Path((_namespace_id, element_key)): Path<(String, String)>,
) -> Result<StatusCode, PlatformError> {
    state
        .delete_use_case
        .execute(DeleteElementCommand {
            namespace_id: access.namespace.id,
            key: element_key,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create elements router
pub fn elements_router(state: ElementsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_elements))
        .routes(routes!(list_namespace_elements))
        .routes(routes!(create_paste))
        .routes(routes!(create_redirect))
        .routes(routes!(get_element, update_element, delete_element))
        .with_state(state)
}
