//! Shared harness for the HTTP tests: both routers over one in-memory store.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use lb_platform::{
    admin_router, public_gateway_router, AdminSettings, Argon2Config, Repositories, TokenService,
};

pub const ADMIN_TOKEN: &str = "admin-secret-token";

pub struct TestApp {
    pub admin: Router,
    pub gateway: Router,
    pub repos: Repositories,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(false, None)
    }

    pub fn with_invites() -> Self {
        Self::build(true, None)
    }

    pub fn with_root_redirect(target: &str) -> Self {
        Self::build(false, Some(target.to_string()))
    }

    fn build(invites_enabled: bool, root_redirect: Option<String>) -> Self {
        let repos = Repositories::in_memory();
        let token_service = Arc::new(TokenService::new(Argon2Config::testing()).unwrap());
        let settings = AdminSettings {
            admin_tokens: vec![ADMIN_TOKEN.to_string()],
            invites_enabled,
            requests_per_minute: 0,
            production: false,
        };

        Self {
            admin: admin_router(&repos, token_service, &settings),
            gateway: public_gateway_router(&repos, root_redirect),
            repos,
        }
    }

    /// Send a request to the admin API and decode the JSON body (`Null` when empty).
    pub async fn admin(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.admin.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, read_json(response).await)
    }

    pub async fn gateway_get(&self, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.gateway.clone().oneshot(request).await.unwrap()
    }

    /// Create a namespace as admin and return its token.
    pub async fn create_namespace(&self, id: &str) -> String {
        let (status, body) = self
            .admin(
                Method::POST,
                "/namespaces",
                Some(ADMIN_TOKEN),
                Some(serde_json::json!({ "id": id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a paste with the given token and return the response body.
    pub async fn create_paste(&self, namespace_id: &str, token: &str, body: Value) -> Value {
        let (status, body) = self
            .admin(
                Method::POST,
                &format!("/elements/{namespace_id}/paste"),
                Some(token),
                Some(body),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

pub async fn read_body(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = read_body(response).await;
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
