//! API Middleware
//!
//! Bearer-token authorization for the admin API. `AuthLayer` injects
//! `AuthState` into request extensions; the extractors below read it.
//!
//! - `Caller`: optional credentials, never rejects
//! - `AdminOnly`: 401 without a bearer token, 403 when it is not an admin token
//! - `NamespaceAccess`: loads `{namespace_id}` and requires its token or an admin token

use axum::{
    extract::{FromRequestParts, Path},
    http::{header::AUTHORIZATION, request::Parts},
    response::Response,
    RequestPartsExt,
};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::warn;

use crate::shared::error::PlatformError;
use crate::shared::token_service::TokenService;
use crate::{Namespace, NamespaceRepository};

/// Path parameter holding the namespace ID on namespace-scoped routes.
pub const NAMESPACE_PATH_PARAM: &str = "namespace_id";

/// Shared authorization state
#[derive(Clone)]
pub struct AuthState {
    admin_tokens: Arc<Vec<String>>,
    token_service: Arc<TokenService>,
    namespaces: Arc<dyn NamespaceRepository>,
}

impl AuthState {
    pub fn new(
        admin_tokens: Vec<String>,
        token_service: Arc<TokenService>,
        namespaces: Arc<dyn NamespaceRepository>,
    ) -> Self {
        Self {
            admin_tokens: Arc::new(admin_tokens),
            token_service,
            namespaces,
        }
    }

    /// Exact match against the configured admin tokens, in constant time per candidate.
    pub fn is_admin_token(&self, token: &str) -> bool {
        self.admin_tokens
            .iter()
            .fold(false, |found, admin| {
                found | bool::from(admin.as_bytes().ct_eq(token.as_bytes()))
            })
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn auth_state(parts: &Parts) -> Result<AuthState, PlatformError> {
    parts
        .extensions
        .get::<AuthState>()
        .cloned()
        .ok_or_else(|| PlatformError::internal("Auth state not configured"))
}

/// Credentials presented with a request, if any.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub bearer: Option<String>,
    pub is_admin: bool,
}

impl Caller {
    fn from_parts(parts: &Parts, state: &AuthState) -> Self {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .map(String::from);

        let is_admin = bearer
            .as_deref()
            .is_some_and(|token| state.is_admin_token(token));

        Self { bearer, is_admin }
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = auth_state(parts)?;
        Ok(Caller::from_parts(parts, &auth))
    }
}

/// Admin token required.
#[derive(Debug, Clone)]
pub struct AdminOnly;

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = auth_state(parts)?;
        let caller = Caller::from_parts(parts, &auth);

        if caller.bearer.is_none() {
            return Err(PlatformError::Unauthorized);
        }
        if !caller.is_admin {
            return Err(PlatformError::Forbidden);
        }
        Ok(AdminOnly)
    }
}

/// The namespace named in the path, authorized for the caller.
#[derive(Debug, Clone)]
pub struct NamespaceAccess {
    pub namespace: Namespace,
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for NamespaceAccess
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = auth_state(parts)?;
        let caller = Caller::from_parts(parts, &auth);

        let Path(params) = parts
            .extract::<Path<HashMap<String, String>>>()
            .await
            .map_err(|e| PlatformError::internal(format!("Path extraction failed: {}", e)))?;
        let id = params
            .get(NAMESPACE_PATH_PARAM)
            .map(|id| id.to_lowercase())
            .ok_or_else(|| PlatformError::internal("Route has no namespace parameter"))?;

        // Non-admins learn nothing about IDs they hold no token for
        let Some(namespace) = auth.namespaces.find_by_id(&id).await? else {
            return Err(if caller.is_admin {
                PlatformError::namespace_not_found(id)
            } else {
                PlatformError::Unauthorized
            });
        };

        if !caller.is_admin {
            let bearer = caller.bearer.as_deref().ok_or(PlatformError::Unauthorized)?;
            match auth.token_service.check(&namespace.token_hash, bearer) {
                Ok(true) => {}
                Ok(false) => return Err(PlatformError::Unauthorized),
                Err(e) => {
                    warn!(namespace = %namespace.id, error = %e, "Namespace token check failed");
                    return Err(PlatformError::Unauthorized);
                }
            }
        }

        Ok(NamespaceAccess {
            namespace,
            is_admin: caller.is_admin,
        })
    }
}

/// Middleware layer that injects `AuthState` into request extensions
#[derive(Clone)]
pub struct AuthLayer {
    state: AuthState,
}

impl AuthLayer {
    pub fn new(state: AuthState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    state: AuthState,
}

impl<S, B> Service<axum::http::Request<B>> for AuthMiddleware<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(self.state.clone());

        let future = self.inner.call(req);
        Box::pin(future)
    }
}
