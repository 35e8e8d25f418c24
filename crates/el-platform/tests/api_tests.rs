//! Platform API Integration Tests
//!
//! Drives the generic CRUD router through the full middleware chain
//! (bearer auth → permission gate → handlers) against the in-memory store.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use el_platform::{
    crud_router, permissions, AppState, AuthLayer, AuthService, CrudPermissions, CrudService,
    MemoryStore, PermissionCache, PermissionSource, User,
};

/// Permission source with a fixed grant set.
struct StaticGrants(HashSet<String>);

#[async_trait]
impl PermissionSource for StaticGrants {
    async fn permissions_for_user(
        &self,
        _user_id: i64,
    ) -> el_platform::Result<HashSet<String>> {
        Ok(self.0.clone())
    }
}

fn user_permissions() -> CrudPermissions {
    CrudPermissions {
        view: permissions::users::VIEW,
        create: permissions::users::CREATE,
        update: permissions::users::UPDATE,
        delete: permissions::users::DELETE,
        export: permissions::users::EXPORT,
    }
}

/// Build an app over the in-memory user store and a bearer token whose
/// holder has the given grants.
fn test_app(grants: &[&str]) -> (Router, String) {
    let auth_service = Arc::new(AuthService::new("test-secret", "entrelaunch", 3600));
    let token = auth_service
        .issue_token(1, Some("tester@example.com"))
        .unwrap();

    let source = StaticGrants(grants.iter().map(|p| p.to_string()).collect());
    let permission_cache = Arc::new(PermissionCache::new(Arc::new(source)));

    let store = Arc::new(MemoryStore::<User>::new());
    let service = Arc::new(CrudService::new(store, 30));

    let app = Router::new()
        .nest("/api/users", crud_router(service, user_permissions()))
        .layer(AuthLayer::new(AppState {
            auth_service,
            permission_cache,
        }));

    (app, token)
}

fn request(token: Option<&str>, method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn create_payload(email: &str) -> serde_json::Value {
    serde_json::json!({ "email": email, "displayName": "Tester" })
}

#[tokio::test]
async fn test_create_returns_envelope_with_id() {
    let (app, token) = test_app(&["*:*"]);

    let response = app
        .oneshot(request(
            Some(&token),
            "POST",
            "/api/users/create",
            Some(create_payload("a@example.com")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["isSuccess"], true);
    assert_eq!(json["data"]["email"], "a@example.com");
    assert!(json["data"]["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_unauthenticated_request_is_401() {
    let (app, _token) = test_app(&["*:*"]);

    let response = app
        .oneshot(request(None, "GET", "/api/users/all", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_missing_permission_is_403_naming_it() {
    let (app, token) = test_app(&["users:view"]);

    // view is granted
    let response = app
        .clone()
        .oneshot(request(Some(&token), "GET", "/api/users/all", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // delete is not
    let response = app
        .oneshot(request(Some(&token), "DELETE", "/api/users/delete/1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "FORBIDDEN");
    assert_eq!(json["missingPermission"], "users:delete");
}

#[tokio::test]
async fn test_get_one_missing_is_404_failure_envelope() {
    let (app, token) = test_app(&["*:*"]);

    let response = app
        .oneshot(request(Some(&token), "GET", "/api/users/get-one/99", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["isSuccess"], false);
}

#[tokio::test]
async fn test_delete_then_get_reports_not_found() {
    let (app, token) = test_app(&["*:*"]);

    let created = app
        .clone()
        .oneshot(request(
            Some(&token),
            "POST",
            "/api/users/create",
            Some(create_payload("a@example.com")),
        ))
        .await
        .unwrap();
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let deleted = app
        .clone()
        .oneshot(request(
            Some(&token),
            "DELETE",
            &format!("/api/users/delete/{}", id),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    let fetched = app
        .oneshot(request(
            Some(&token),
            "GET",
            &format!("/api/users/get-one/{}", id),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_all_shrinks_by_one_after_delete() {
    let (app, token) = test_app(&["*:*"]);

    let mut ids = Vec::new();
    for i in 0..3 {
        let created = app
            .clone()
            .oneshot(request(
                Some(&token),
                "POST",
                "/api/users/create",
                Some(create_payload(&format!("u{}@example.com", i))),
            ))
            .await
            .unwrap();
        ids.push(body_json(created).await["data"]["id"].as_i64().unwrap());
    }

    app.clone()
        .oneshot(request(
            Some(&token),
            "DELETE",
            &format!("/api/users/delete/{}", ids[0]),
            None,
        ))
        .await
        .unwrap();

    let all = app
        .oneshot(request(Some(&token), "GET", "/api/users/all", None))
        .await
        .unwrap();
    let json = body_json(all).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_patch_is_noop() {
    let (app, token) = test_app(&["*:*"]);

    let created = app
        .clone()
        .oneshot(request(
            Some(&token),
            "POST",
            "/api/users/create",
            Some(create_payload("a@example.com")),
        ))
        .await
        .unwrap();
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let patched = app
        .clone()
        .oneshot(request(
            Some(&token),
            "PATCH",
            &format!("/api/users/edit/{}", id),
            Some(serde_json::json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(patched.status(), StatusCode::OK);
    let patched = body_json(patched).await;

    let fetched = app
        .oneshot(request(
            Some(&token),
            "GET",
            &format!("/api/users/get-one/{}", id),
            None,
        ))
        .await
        .unwrap();
    let fetched = body_json(fetched).await;

    assert_eq!(patched["data"]["email"], fetched["data"]["email"]);
    assert_eq!(patched["data"]["displayName"], fetched["data"]["displayName"]);
    assert_eq!(fetched["data"]["email"], "a@example.com");
}

#[tokio::test]
async fn test_export_of_zero_rows_is_failure_not_empty_file() {
    let (app, token) = test_app(&["*:*"]);

    let response = app
        .oneshot(request(Some(&token), "GET", "/api/users/export/csv", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["isSuccess"], false);
}

#[tokio::test]
async fn test_csv_export_carries_rows() {
    let (app, token) = test_app(&["*:*"]);

    app.clone()
        .oneshot(request(
            Some(&token),
            "POST",
            "/api/users/create",
            Some(create_payload("a@example.com")),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(request(Some(&token), "GET", "/api/users/export/csv", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(lines.next().unwrap(), "id,email,displayName,active,createdAt,updatedAt");
    assert!(lines.next().unwrap().contains("a@example.com"));
}

#[tokio::test]
async fn test_unknown_export_format_is_400() {
    let (app, token) = test_app(&["*:*"]);

    let response = app
        .oneshot(request(Some(&token), "GET", "/api/users/export/pdf", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
