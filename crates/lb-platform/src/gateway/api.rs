//! Public gateway
//!
//! - `GET /` - redirect to the configured root target, 404 otherwise
//! - `GET /{namespace_id}`, `GET /{namespace_id}/` - the namespace's `@` element
//! - `GET /{namespace_id}/{element_key}` - paste body (200) or redirect (307)

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::gateway::resolver::{Resolution, Resolver};
use crate::shared::error::PlatformError;

/// Gateway service state
#[derive(Clone)]
pub struct GatewayState {
    pub resolver: Resolver,
    pub root_redirect: Option<Arc<str>>,
}

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        match self {
            Resolution::Paste(content) => (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                content,
            )
                .into_response(),
            Resolution::Redirect(target) => Redirect::temporary(&target).into_response(),
        }
    }
}

async fn root(State(state): State<GatewayState>) -> Result<Redirect, PlatformError> {
    state
        .root_redirect
        .as_deref()
        .map(Redirect::permanent)
        .ok_or(PlatformError::RouteNotFound)
}

async fn resolve_default(
    State(state): State<GatewayState>,
    Path(namespace_id): Path<String>,
) -> Result<Resolution, PlatformError> {
    state.resolver.resolve(&namespace_id, None).await
}

async fn resolve_element(
    State(state): State<GatewayState>,
    Path((namespace_id, element_key)): Path<(String, String)>,
) -> Result<Resolution, PlatformError> {
    state
        .resolver
        .resolve(&namespace_id, Some(&element_key))
        .await
}

/// Create gateway router
pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/{namespace_id}", get(resolve_default))
        .route("/{namespace_id}/", get(resolve_default))
        .route("/{namespace_id}/{element_key}", get(resolve_element))
        .fallback(|| async { PlatformError::RouteNotFound })
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
