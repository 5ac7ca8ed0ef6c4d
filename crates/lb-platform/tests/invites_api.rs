mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, ADMIN_TOKEN};

#[tokio::test]
async fn test_invites_disabled() {
    let app = TestApp::new();
    let token = app.create_namespace("demo").await;

    let (status, _) = app.admin(Method::GET, "/invites", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .admin(Method::GET, "/invites", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["code"], 4000);
}

#[tokio::test]
async fn test_invite_gates_public_namespace_creation() {
    let app = TestApp::with_invites();

    let (status, invite) = app
        .admin(
            Method::POST,
            "/invites",
            Some(ADMIN_TOKEN),
            Some(json!({ "code": "welcome", "max_uses": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invite["uses"], 0);

    let (status, body) = app
        .admin(Method::POST, "/namespaces", None, Some(json!({ "id": "first" })))
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["code"], 2002);

    let (status, _) = app
        .admin(
            Method::POST,
            "/namespaces",
            None,
            Some(json!({ "id": "first", "invite": "welcome" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .admin(
            Method::POST,
            "/namespaces",
            None,
            Some(json!({ "id": "second", "invite": "welcome" })),
        )
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    let (status, body) = app
        .admin(Method::GET, "/invites/welcome", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uses"], 1);

    // Admins need no invite
    app.create_namespace("second").await;

    let (status, body) = app.admin(Method::GET, "/info", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["invites"], true);
}

#[tokio::test]
async fn test_invite_management() {
    let app = TestApp::with_invites();

    let (status, generated) = app
        .admin(Method::POST, "/invites", Some(ADMIN_TOKEN), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(generated["code"].as_str().unwrap().len(), 32);
    assert_eq!(generated["max_uses"], -1);

    let (status, _) = app
        .admin(
            Method::POST,
            "/invites",
            Some(ADMIN_TOKEN),
            Some(json!({ "code": "team" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .admin(
            Method::POST,
            "/invites",
            Some(ADMIN_TOKEN),
            Some(json!({ "code": "team" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4001);

    let (status, body) = app
        .admin(
            Method::PATCH,
            "/invites/team",
            Some(ADMIN_TOKEN),
            Some(json!({ "code": "crew", "max_uses": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "crew");
    assert_eq!(body["max_uses"], 5);

    let (status, body) = app
        .admin(Method::GET, "/invites", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total_elements"], 2);

    let (status, _) = app
        .admin(Method::DELETE, "/invites/crew", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .admin(Method::GET, "/invites/crew", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1006);
}
