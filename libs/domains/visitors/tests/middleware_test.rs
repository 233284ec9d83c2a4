//! The tracking middleware in front of a stub catalog router

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::{Extension, Router, middleware, routing::get};
use axum_helpers::{AuthPrincipal, Role};
use domain_visitors::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower::ServiceExt;

fn catalog() -> Router {
    Router::new()
        .route("/api/products", get(|| async { "[]" }))
        .route(
            "/api/products/{id}",
            get(|| async { (StatusCode::NOT_FOUND, "missing") }),
        )
        .route("/api/categories", get(|| async { "[]" }))
}

async fn recorded(
    requests: Vec<Request<Body>>,
    principal: Option<AuthPrincipal>,
) -> (Vec<VisitTrack>, Vec<Option<String>>) {
    let repo = Arc::new(InMemoryVisitorRepository::new());
    let (tracker, worker) = visitor_channel(repo.clone(), &VisitorConfig::default());

    let mut app = catalog().layer(middleware::from_fn_with_state(tracker.clone(), track_visits));
    if let Some(principal) = principal {
        app = app.layer(Extension(principal));
    }

    let mut cookies = Vec::new();
    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        cookies.push(
            response
                .headers()
                .get(header::SET_COOKIE)
                .map(|v| v.to_str().unwrap().to_string()),
        );
    }

    drop(app);
    drop(tracker);
    let (_tx, rx) = broadcast::channel(1);
    tokio::time::timeout(Duration::from_secs(5), worker.run(rx))
        .await
        .unwrap();

    (repo.snapshot().await, cookies)
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_listing_view_is_recorded_with_origin() {
    let request = Request::builder()
        .uri("/api/products?category=Electronics")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .header(header::USER_AGENT, "test-browser")
        .body(Body::empty())
        .unwrap();

    let (visits, cookies) = recorded(vec![request], None).await;
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].page, "products");
    assert_eq!(visits[0].ip_address, "203.0.113.9");
    assert_eq!(visits[0].user_agent, "test-browser");
    assert!(visits[0].user_id.is_none());
    assert!(cookies[0].as_deref().unwrap().starts_with("visitor_id="));
}

#[tokio::test]
async fn test_known_visitor_keeps_id_and_user() {
    let request = Request::builder()
        .uri("/api/products")
        .header(header::COOKIE, "visitor_id=returning-1")
        .body(Body::empty())
        .unwrap();
    let principal = AuthPrincipal {
        id: "u-9".into(),
        email: "u9@shop.com".into(),
        name: "U9".into(),
        role: Role::User,
    };

    let (visits, cookies) = recorded(vec![request], Some(principal)).await;
    assert_eq!(visits[0].visitor_id, "returning-1");
    assert_eq!(visits[0].user_id.as_deref(), Some("u-9"));
    assert!(cookies[0].is_none());
}

#[tokio::test]
async fn test_failed_and_untracked_requests_are_not_recorded() {
    let post = Request::builder()
        .method("POST")
        .uri("/api/products")
        .body(Body::empty())
        .unwrap();

    let (visits, _) = recorded(
        vec![get_req("/api/products/nope"), get_req("/api/categories"), post],
        None,
    )
    .await;
    assert!(visits.is_empty());
}
