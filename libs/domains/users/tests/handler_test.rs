//! Handler tests for profiles, account admin and the session login flow
//!
//! Everything runs against the in-memory repository. Routes behind the auth
//! middleware get their principal as a request extension.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::{Extension, Router, middleware};
use axum_helpers::{AuthPrincipal, Role, principal_middleware};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct StaticSessions;

#[async_trait]
impl SessionDataSource for StaticSessions {
    async fn fetch(&self, session_id: &str) -> UserResult<SessionIdentity> {
        match session_id {
            "admin-session" => Ok(SessionIdentity {
                email: "admin@shop.com".into(),
                name: "Shop Admin".into(),
                picture: None,
            }),
            "shopper-session" => Ok(SessionIdentity {
                email: "shopper@example.com".into(),
                name: "Shopper".into(),
                picture: Some("https://img/shopper.png".into()),
            }),
            _ => Err(UserError::InvalidSession),
        }
    }
}

fn seeded_repo() -> (InMemoryUserRepository, User, User) {
    let admin = User::new("admin@shop.com", "Admin", Role::Admin, AuthProvider::Session);
    let user = User::new("jane@example.com", "Jane", Role::User, AuthProvider::Google);
    let repo = InMemoryUserRepository::with_users(vec![admin.clone(), user.clone()]);
    (repo, admin, user)
}

fn as_principal(app: Router, user: &User) -> Router {
    app.layer(Extension::<AuthPrincipal>(user.principal()))
}

fn session_app(repo: InMemoryUserRepository) -> Router {
    let users = Arc::new(repo);
    let strategy = Arc::new(SessionStrategy::new(
        users.clone(),
        Arc::new(StaticSessions),
        SessionConfig::default(),
    ));
    let strategy = AuthStrategy::Session(strategy);

    handlers::router(UserService::from_shared(users))
        .merge(strategy.router())
        .layer(middleware::from_fn_with_state(
            strategy.resolver(),
            principal_middleware,
        ))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_me_requires_authentication() {
    let (repo, _, _) = seeded_repo();
    let response = handlers::router(UserService::new(repo))
        .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile_changes_name_only() {
    let (repo, _, jane) = seeded_repo();
    let app = as_principal(handlers::router(UserService::new(repo.clone())), &jane);

    let request = Request::builder()
        .method("PUT")
        .uri("/profile")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "Jane Doe", "role": "admin" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["name"], "Jane Doe");
    assert_eq!(body["role"], "user");
    assert!(body.get("session_token").is_none());
}

#[tokio::test]
async fn test_update_profile_rejects_empty_name() {
    let (repo, _, jane) = seeded_repo();
    let app = as_principal(handlers::router(UserService::new(repo)), &jane);

    let request = Request::builder()
        .method("PUT")
        .uri("/profile")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_users_listing_is_admin_only() {
    let (repo, admin, jane) = seeded_repo();

    let response = as_principal(handlers::router(UserService::new(repo.clone())), &jane)
        .oneshot(Request::builder().uri("/admin/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = as_principal(handlers::router(UserService::new(repo)), &admin)
        .oneshot(Request::builder().uri("/admin/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_session_login_me_logout_roundtrip() {
    let repo = InMemoryUserRepository::new();
    let app = session_app(repo.clone());

    let response = app
        .clone()
        .oneshot(post_json("/auth/session", json!({ "session_id": "admin-session" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Authentication successful");
    assert_eq!(body["user"]["role"], "admin");
    let token = body["session_token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_with_token("/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response.into_body()).await["email"], "admin@shop.com");

    let logout = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(logout).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_with_token("/auth/me", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(repo.snapshot().await[0].session_token.is_none());
}

#[tokio::test]
async fn test_new_session_user_is_regular() {
    let response = session_app(InMemoryUserRepository::new())
        .oneshot(post_json("/auth/session", json!({ "session_id": "shopper-session" })))
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["picture"], "https://img/shopper.png");
}

#[tokio::test]
async fn test_unknown_session_id_is_401() {
    let repo = InMemoryUserRepository::new();
    let response = session_app(repo.clone())
        .oneshot(post_json("/auth/session", json!({ "session_id": "nope" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(repo.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_logout_without_session_still_succeeds() {
    let response = session_app(InMemoryUserRepository::new())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response.into_body()).await["message"],
        "Logged out successfully"
    );
}
