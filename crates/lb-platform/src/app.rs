//! Router assembly
//!
//! Wires repositories into use cases and use cases into the admin API and
//! gateway routers. Everything is passed explicitly; handlers never look up
//! services globally.

use axum::{middleware, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{Components, OpenApi};
use utoipa_axum::router::OpenApiRouter;

use crate::element::operations::{
    CreatePasteElementUseCase, CreateRedirectElementUseCase, DeleteElementUseCase,
    UpdateElementUseCase,
};
use crate::gateway::{gateway_router, GatewayState, Resolver};
use crate::invite::operations::{CreateInviteUseCase, DeleteInviteUseCase, UpdateInviteUseCase};
use crate::namespace::operations::{
    ActivateNamespaceUseCase, CreateNamespaceUseCase, DeactivateNamespaceUseCase,
    DeleteNamespaceUseCase, ResetNamespaceTokenUseCase,
};
use crate::shared::error::PlatformError;
use crate::shared::info_api::{info_router, InfoResponse};
use crate::shared::middleware::{AuthLayer, AuthState};
use crate::shared::rate_limit::{ip_rate_limiter, rate_limit};
use crate::shared::token_service::TokenService;
use crate::storage::Repositories;
use crate::{
    elements_router, invites_router, namespaces_router, ElementsState, InvitesState,
    NamespacesState,
};

/// Admin API settings, usually taken from the process configuration.
#[derive(Debug, Clone, Default)]
pub struct AdminSettings {
    pub admin_tokens: Vec<String>,
    pub invites_enabled: bool,
    /// 0 disables rate limiting
    pub requests_per_minute: u32,
    pub production: bool,
}

/// Admin API router: `/info`, `/namespaces`, `/elements`, `/invites`, `/openapi.json`.
pub fn admin_router(
    repos: &Repositories,
    token_service: Arc<TokenService>,
    settings: &AdminSettings,
) -> Router {
    let namespaces_state = NamespacesState {
        namespace_repo: repos.namespaces.clone(),
        create_use_case: Arc::new(CreateNamespaceUseCase::new(
            repos.namespaces.clone(),
            repos.invites.clone(),
            token_service.clone(),
            settings.invites_enabled,
        )),
        reset_token_use_case: Arc::new(ResetNamespaceTokenUseCase::new(
            repos.namespaces.clone(),
            token_service.clone(),
        )),
        activate_use_case: Arc::new(ActivateNamespaceUseCase::new(repos.namespaces.clone())),
        deactivate_use_case: Arc::new(DeactivateNamespaceUseCase::new(repos.namespaces.clone())),
        delete_use_case: Arc::new(DeleteNamespaceUseCase::new(
            repos.namespaces.clone(),
            repos.elements.clone(),
        )),
    };

    let elements_state = ElementsState {
        element_repo: repos.elements.clone(),
        create_paste_use_case: Arc::new(CreatePasteElementUseCase::new(
            repos.namespaces.clone(),
            repos.elements.clone(),
        )),
        create_redirect_use_case: Arc::new(CreateRedirectElementUseCase::new(
            repos.namespaces.clone(),
            repos.elements.clone(),
        )),
        update_use_case: Arc::new(UpdateElementUseCase::new(repos.elements.clone())),
        delete_use_case: Arc::new(DeleteElementUseCase::new(repos.elements.clone())),
    };

    let invites_state = InvitesState {
        enabled: settings.invites_enabled,
        invite_repo: repos.invites.clone(),
        create_use_case: Arc::new(CreateInviteUseCase::new(repos.invites.clone())),
        update_use_case: Arc::new(UpdateInviteUseCase::new(repos.invites.clone())),
        delete_use_case: Arc::new(DeleteInviteUseCase::new(repos.invites.clone())),
    };

    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/info", info_router(InfoResponse::new(settings.production, settings.invites_enabled)))
        .nest("/namespaces", namespaces_router(namespaces_state))
        .nest("/elements", elements_router(elements_state))
        .nest("/invites", invites_router(invites_state))
        .split_for_parts();
    describe_api(&mut openapi);

    let auth_state = AuthState::new(
        settings.admin_tokens.clone(),
        token_service,
        repos.namespaces.clone(),
    );

    let mut app = Router::new()
        .merge(router)
        .route(
            "/openapi.json",
            get(move || {
                let document = openapi.clone();
                async move { Json(document) }
            }),
        )
        .fallback(|| async { PlatformError::RouteNotFound })
        .layer(AuthLayer::new(auth_state));

    if let Some(limiter) = ip_rate_limiter(settings.requests_per_minute) {
        app = app.layer(middleware::from_fn_with_state(limiter, rate_limit));
    }

    app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn describe_api(openapi: &mut OpenApi) {
    openapi.info.title = "Linkbox Admin API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description = Some("Namespaces, pastes, redirects and invites".to_string());

    openapi
        .components
        .get_or_insert_with(Components::new)
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
}

/// Public gateway router.
pub fn public_gateway_router(repos: &Repositories, root_redirect: Option<String>) -> Router {
    gateway_router(GatewayState {
        resolver: Resolver::new(repos.namespaces.clone(), repos.elements.clone()),
        root_redirect: root_redirect.map(Arc::from),
    })
}
