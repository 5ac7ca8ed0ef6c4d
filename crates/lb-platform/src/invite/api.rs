//! Invites Admin API
//!
//! Admin-only. Every route answers 412 while invites are disabled.

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::invite::operations::{
    CreateInviteCommand, CreateInviteUseCase, DeleteInviteCommand, DeleteInviteUseCase,
    UpdateInviteCommand, UpdateInviteUseCase,
};
use crate::shared::api_common::{ApiJson, PaginatedResponse, Pagination};
use crate::shared::error::{ErrorResponse, PlatformError};
use crate::shared::middleware::AdminOnly;
use crate::{Invite, InviteRepository};

/// Create invite request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateInviteRequest {
    /// Requested code, generated when absent
    pub code: Option<String>,
    /// Unlimited when absent
    pub max_uses: Option<i32>,
}

/// Update invite request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInviteRequest {
    /// New code
    pub code: Option<String>,
    pub max_uses: Option<i32>,
}

/// Invite response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct InviteResponse {
    pub code: String,
    pub uses: i32,
    /// -1 means unlimited
    pub max_uses: i32,
    pub created: i64,
}

impl From<Invite> for InviteResponse {
    fn from(i: Invite) -> Self {
        Self {
            code: i.code,
            uses: i.uses,
            max_uses: i.max_uses,
            created: i.created,
        }
    }
}

/// Invites service state
#[derive(Clone)]
pub struct InvitesState {
    pub enabled: bool,
    pub invite_repo: Arc<dyn InviteRepository>,
    pub create_use_case: Arc<CreateInviteUseCase>,
    pub update_use_case: Arc<UpdateInviteUseCase>,
    pub delete_use_case: Arc<DeleteInviteUseCase>,
}

/// Admin caller on an instance with invites enabled.
pub struct InviteAdmin;

impl FromRequestParts<InvitesState> for InviteAdmin {
    type Rejection = PlatformError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &InvitesState,
    ) -> Result<Self, Self::Rejection> {
        AdminOnly::from_request_parts(parts, state).await?;
        if !state.enabled {
            return Err(PlatformError::InvitesDisabled);
        }
        Ok(InviteAdmin)
    }
}

/// List invites
#[utoipa::path(
    get,
    path = "",
    tag = "invites",
    params(Pagination),
    responses(
        (status = 200, description = "Page of invites", body = PaginatedResponse<InviteResponse>),
        (status = 403, description = "Not an admin token", body = ErrorResponse),
        (status = 412, description = "Invites are disabled", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_invites(
    State(state): State<InvitesState>,
    _admin: InviteAdmin,
    pagination: Pagination,
) -> Result<Json<PaginatedResponse<InviteResponse>>, PlatformError> {
    let found = state
        .invite_repo
        .find_all(pagination.limit, pagination.skip)
        .await?;
    let total = state.invite_repo.count().await?;

    let data = found.into_iter().map(InviteResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total)))
}

/// Create an invite
#[utoipa::path(
    post,
    path = "",
    tag = "invites",
    request_body = CreateInviteRequest,
    responses(
        (status = 201, description = "Invite created", body = InviteResponse),
        (status = 409, description = "Invite code in use", body = ErrorResponse),
        (status = 412, description = "Invites are disabled", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_invite(
    State(state): State<InvitesState>,
    _admin: InviteAdmin,
    ApiJson(req): ApiJson<CreateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), PlatformError> {
    let invite = state
        .create_use_case
        .execute(CreateInviteCommand {
            code: req.code,
            max_uses: req.max_uses,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(invite.into())))
}

/// Get an invite
#[utoipa::path(
    get,
    path = "/{code}",
    tag = "invites",
    params(("code" = String, Path, description = "Invite code")),
    responses(
        (status = 200, description = "Invite found", body = InviteResponse),
        (status = 404, description = "Invite not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_invite(
    State(state): State<InvitesState>,
    _admin: InviteAdmin,
    Path(code): Path<String>,
) -> Result<Json<InviteResponse>, PlatformError> {
    let invite = state
        .invite_repo
        .find_by_code(&code)
        .await?
        .ok_or_else(|| PlatformError::invite_not_found(code))?;

    Ok(Json(invite.into()))
}

/// Update an invite
#[utoipa::path(
    patch,
    path = "/{code}",
    tag = "invites",
    params(("code" = String, Path, description = "Invite code")),
    request_body = UpdateInviteRequest,
    responses(
        (status = 200, description = "Invite updated", body = InviteResponse),
        (status = 404, description = "Invite not found", body = ErrorResponse),
        (status = 409, description = "New code in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_invite(
    State(state): State<InvitesState>,
    _admin: InviteAdmin,
    Path(code): Path<String>,
    ApiJson(req): ApiJson<UpdateInviteRequest>,
) -> Result<Json<InviteResponse>, PlatformError> {
    let invite = state
        .update_use_case
        .execute(UpdateInviteCommand {
            code,
            new_code: req.code,
            max_uses: req.max_uses,
        })
        .await?;

    Ok(Json(invite.into()))
}

/// Delete an invite
#[utoipa::path(
    delete,
    path = "/{code}",
    tag = "invites",
    params(("code" = String, Path, description = "Invite code")),
    responses(
        (status = 204, description = "Invite deleted"),
        (status = 404, description = "Invite not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_invite(
    State(state): State<InvitesState>,
    _admin: InviteAdmin,
    Path(code): Path<String>,
) -> Result<StatusCode, PlatformError> {
    state
        .delete_use_case
        .execute(DeleteInviteCommand { code })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create invites router
pub fn invites_router(state: InvitesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_invites, create_invite))
        .routes(routes!(get_invite, update_invite, delete_invite))
        .with_state(state)
}
