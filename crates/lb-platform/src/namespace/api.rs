//! Namespaces Admin API
//!
//! Namespace lifecycle endpoints. Tokens are returned in plaintext only by
//! create and reset; every other response omits them.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::namespace::operations::{
    ActivateNamespaceCommand, ActivateNamespaceUseCase, CreateNamespaceCommand,
    CreateNamespaceUseCase, DeactivateNamespaceCommand, DeactivateNamespaceUseCase,
    DeleteNamespaceCommand, DeleteNamespaceUseCase, ResetNamespaceTokenCommand,
    ResetNamespaceTokenUseCase,
};
use crate::shared::api_common::{ApiJson, PaginatedResponse, Pagination};
use crate::shared::error::{ErrorResponse, PlatformError};
use crate::shared::middleware::{AdminOnly, Caller, NamespaceAccess};
use crate::{Namespace, NamespaceRepository};

/// Create namespace request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNamespaceRequest {
    /// Namespace ID (1-32 chars of `a-z0-9_`)
    pub id: String,

    /// Invite code, required from non-admins while invites are enabled
    #[serde(default, alias = "invite_code")]
    pub invite: Option<String>,
}

/// Update namespace request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNamespaceRequest {
    pub active: Option<bool>,
}

/// Namespace response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct NamespaceResponse {
    pub id: String,
    pub active: bool,
    /// Unix seconds
    pub created: i64,
}

impl From<Namespace> for NamespaceResponse {
    fn from(n: Namespace) -> Self {
        Self {
            id: n.id,
            active: n.active,
            created: n.created,
        }
    }
}

/// Namespace plus its freshly issued plaintext token
#[derive(Debug, Serialize, ToSchema)]
pub struct NamespaceWithTokenResponse {
    pub id: String,
    /// Shown only once
    pub token: String,
    pub active: bool,
    pub created: i64,
}

impl NamespaceWithTokenResponse {
    fn new(namespace: Namespace, token: String) -> Self {
        Self {
            id: namespace.id,
            token,
            active: namespace.active,
            created: namespace.created,
        }
    }
}

/// Namespaces service state
#[derive(Clone)]
pub struct NamespacesState {
    pub namespace_repo: Arc<dyn NamespaceRepository>,
    pub create_use_case: Arc<CreateNamespaceUseCase>,
    pub reset_token_use_case: Arc<ResetNamespaceTokenUseCase>,
    pub activate_use_case: Arc<ActivateNamespaceUseCase>,
    pub deactivate_use_case: Arc<DeactivateNamespaceUseCase>,
    pub delete_use_case: Arc<DeleteNamespaceUseCase>,
}

/// List namespaces
#[utoipa::path(
    get,
    path = "",
    tag = "namespaces",
    params(Pagination),
    responses(
        (status = 200, description = "Page of namespaces", body = PaginatedResponse<NamespaceResponse>),
        (status = 400, description = "Bad pagination parameter", body = ErrorResponse),
        (status = 401, description = "Missing token", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_namespaces(
    State(state): State<NamespacesState>,
    _admin: AdminOnly,
    pagination: Pagination,
) -> Result<Json<PaginatedResponse<NamespaceResponse>>, PlatformError> {
    let found = state
        .namespace_repo
        .find_all(pagination.limit, pagination.skip)
        .await?;
    let total = state.namespace_repo.count().await?;

    let data = found.into_iter().map(NamespaceResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total)))
}

/// Create a namespace
#[utoipa::path(
    post,
    path = "",
    tag = "namespaces",
    request_body = CreateNamespaceRequest,
    responses(
        (status = 201, description = "Namespace created", body = NamespaceWithTokenResponse),
        (status = 409, description = "Namespace ID in use", body = ErrorResponse),
        (status = 412, description = "Invalid invite code", body = ErrorResponse),
        (status = 422, description = "Illegal namespace ID", body = ErrorResponse)
    )
)]
pub async fn create_namespace(
    State(state): State<NamespacesState>,
    caller: Caller,
    ApiJson(req): ApiJson<CreateNamespaceRequest>,
) -> Result<(StatusCode, Json<NamespaceWithTokenResponse>), PlatformError> {
    let command = CreateNamespaceCommand {
        id: req.id,
        invite_code: req.invite,
        is_admin: caller.is_admin,
    };

    let result = state.create_use_case.execute(command).await?;
    Ok((
        StatusCode::CREATED,
        Json(NamespaceWithTokenResponse::new(result.namespace, result.token)),
    ))
}

/// Get a namespace
#[utoipa::path(
    get,
    path = "/{namespace_id}",
    tag = "namespaces",
    params(("namespace_id" = String, Path, description = "Namespace ID")),
    responses(
        (status = 200, description = "Namespace found", body = NamespaceResponse),
        (status = 401, description = "Missing or wrong token", body = ErrorResponse),
        (status = 404, description = "Namespace not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_namespace(access: NamespaceAccess) -> Json<NamespaceResponse> {
    Json(access.namespace.into())
}

/// Activate or deactivate a namespace
#[utoipa::path(
    patch,
    path = "/{namespace_id}",
    tag = "namespaces",
    params(("namespace_id" = String, Path, description = "Namespace ID")),
    request_body = UpdateNamespaceRequest,
    responses(
        (status = 200, description = "Namespace updated", body = NamespaceResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse),
        (status = 404, description = "Namespace not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_namespace(
    State(state): State<NamespacesState>,
    _admin: AdminOnly,
    access: NamespaceAccess,
    ApiJson(req): ApiJson<UpdateNamespaceRequest>,
) -> Result<Json<NamespaceResponse>, PlatformError> {
    let namespace_id = access.namespace.id.clone();

    let namespace = match req.active {
        Some(true) => {
            state
                .activate_use_case
                .execute(ActivateNamespaceCommand { namespace_id })
                .await?
        }
        Some(false) => {
            state
                .deactivate_use_case
                .execute(DeactivateNamespaceCommand { namespace_id })
                .await?
        }
        None => access.namespace,
    };

    Ok(Json(namespace.into()))
}

/// Issue a new token, invalidating the old one
#[utoipa::path(
    post,
    path = "/{namespace_id}/reset_token",
    tag = "namespaces",
    params(("namespace_id" = String, Path, description = "Namespace ID")),
    responses(
        (status = 200, description = "Token reset", body = NamespaceWithTokenResponse),
        (status = 401, description = "Missing or wrong token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_namespace_token(
    State(state): State<NamespacesState>,
    access: NamespaceAccess,
) -> Result<Json<NamespaceWithTokenResponse>, PlatformError> {
    let result = state
        .reset_token_use_case
        .execute(ResetNamespaceTokenCommand {
            namespace_id: access.namespace.id,
        })
        .await?;

    Ok(Json(NamespaceWithTokenResponse::new(result.namespace, result.token)))
}

/// Delete a namespace and all of its elements
#[utoipa::path(
    delete,
    path = "/{namespace_id}",
    tag = "namespaces",
    params(("namespace_id" = String, Path, description = "Namespace ID")),
    responses(
        (status = 204, description = "Namespace deleted"),
        (status = 401, description = "Missing or wrong token", body = ErrorResponse),
        (status = 404, description = "Namespace not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_namespace(
    State(state): State<NamespacesState>,
    access: NamespaceAccess,
) -> Result<StatusCode, PlatformError> {
    state
        .delete_use_case
        .execute(DeleteNamespaceCommand {
            namespace_id: access.namespace.id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create namespaces router
pub fn namespaces_router(state: NamespacesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_namespaces, create_namespace))
        .routes(routes!(get_namespace, update_namespace, delete_namespace))
        .routes(routes!(reset_namespace_token))
        .with_state(state)
}
