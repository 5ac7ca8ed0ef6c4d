//! Instance information endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::shared::validation::{
    NAMESPACE_ID_ALLOWED_CHARACTERS, NAMESPACE_ID_MAX_LENGTH, NAMESPACE_ID_MIN_LENGTH,
};

/// Rules a namespace ID has to satisfy
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NamespaceIdRules {
    pub min_length: usize,
    pub max_length: usize,
    pub allowed_characters: &'static str,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InfoSettings {
    /// Whether public namespace creation requires an invite
    pub invites: bool,
    pub namespace_id_rules: NamespaceIdRules,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InfoResponse {
    pub version: &'static str,
    pub production: bool,
    pub settings: InfoSettings,
}

impl InfoResponse {
    pub fn new(production: bool, invites: bool) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            production,
            settings: InfoSettings {
                invites,
                namespace_id_rules: NamespaceIdRules {
                    min_length: NAMESPACE_ID_MIN_LENGTH,
                    max_length: NAMESPACE_ID_MAX_LENGTH,
                    allowed_characters: NAMESPACE_ID_ALLOWED_CHARACTERS,
                },
            },
        }
    }
}

/// Version and public settings of this instance
#[utoipa::path(
    get,
    path = "",
    tag = "info",
    responses((status = 200, description = "Instance information", body = InfoResponse))
)]
pub async fn get_info(State(info): State<InfoResponse>) -> Json<InfoResponse> {
    Json(info)
}

pub fn info_router(info: InfoResponse) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_info))
        .with_state(info)
}
