//! Handler tests for the catalog API
//!
//! Routers are backed by the in-memory repository, so these run without a
//! database. The admin principal is injected the same way the auth
//! middleware does it: as a request extension.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Extension, Router};
use axum_helpers::{AuthPrincipal, Role};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use test_utils::assertions::{assert_non_decreasing, assert_non_increasing};
use test_utils::TestDataBuilder;
use tower::ServiceExt;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn product(name: &str, price: f64, category: &str, status: ProductStatus) -> Product {
    let mut p = Product::new(
        CreateProduct {
            name: name.to_string(),
            description: format!("{} for everyday use", name),
            price,
            category: category.to_string(),
            stock: 10,
            images: vec![],
        },
        vec![],
        "seed-admin",
    );
    p.status = status;
    p
}

fn scenario_repo() -> InMemoryProductRepository {
    InMemoryProductRepository::with_products(vec![
        product("Phone", 500.0, "Electronics", ProductStatus::Active),
        product("Shirt", 20.0, "Fashion", ProductStatus::Active),
        product("Old Phone", 100.0, "Electronics", ProductStatus::Inactive),
    ])
}

fn principal(role: Role) -> AuthPrincipal {
    let builder = TestDataBuilder::from_test_name("products_handler");
    AuthPrincipal {
        id: builder.user_id().to_string(),
        email: builder.email("admin"),
        name: "Admin".to_string(),
        role,
    }
}

fn app(repo: InMemoryProductRepository) -> Router {
    handlers::router(ProductService::new(repo, ImagePolicy::default()))
}

fn app_as(repo: InMemoryProductRepository, role: Role) -> Router {
    app(repo).layer(Extension(principal(role)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn test_category_filter_excludes_inactive() {
    let response = app(scenario_repo())
        .oneshot(get("/products?category=Electronics"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(names(&products), vec!["Phone"]);
}

#[tokio::test]
async fn test_price_range_with_sort() {
    let response = app(scenario_repo())
        .oneshot(get("/products?min_price=50&max_price=1000&sort_by=price_low"))
        .await
        .unwrap();

    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(names(&products), vec!["Phone"]);
    assert_eq!(products[0].price, 500.0);
}

#[tokio::test]
async fn test_sort_orders_hold_over_larger_catalog() {
    let repo = InMemoryProductRepository::new();
    for (i, price) in [30.0, 5.0, 120.0, 42.5, 5.0, 999.99].iter().enumerate() {
        repo.insert(&product(&format!("Item {i}"), *price, "Misc", ProductStatus::Active))
            .await
            .unwrap();
    }

    let products: Vec<Product> = json_body(
        app(repo.clone())
            .oneshot(get("/products?sort_by=price_low"))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
    assert_non_decreasing(&prices, "price_low");

    let products: Vec<Product> = json_body(
        app(repo.clone())
            .oneshot(get("/products?sort_by=price_high"))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
    assert_non_increasing(&prices, "price_high");

    let products: Vec<Product> = json_body(
        app(repo)
            .oneshot(get("/products?sort_by=newest"))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let created: Vec<_> = products.iter().map(|p| p.created_at).collect();
    assert_non_increasing(&created, "newest");
}

#[tokio::test]
async fn test_search_without_match_is_empty_list() {
    let response = app(scenario_repo())
        .oneshot(get("/products?search=submarine"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_invalid_filter_returns_coded_400() {
    let response = app(scenario_repo())
        .oneshot(get("/products?min_price=cheap"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_FILTER_PARAMETER");
    assert_eq!(body["details"]["parameter"], "min_price");
}

#[tokio::test]
async fn test_get_missing_product_is_404() {
    let response = app(scenario_repo())
        .oneshot(get("/products/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_authentication() {
    let response = app(scenario_repo())
        .oneshot(json_request(
            "POST",
            "/products",
            json!({ "name": "Lamp", "description": "", "price": 10.0, "category": "Home" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_forbidden_for_regular_user() {
    let response = app_as(scenario_repo(), Role::User)
        .oneshot(json_request(
            "POST",
            "/products",
            json!({ "name": "Lamp", "description": "", "price": 10.0, "category": "Home" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_creates_product() {
    let repo = scenario_repo();
    let response = app_as(repo.clone(), Role::Admin)
        .oneshot(json_request(
            "POST",
            "/products",
            json!({
                "name": "Lamp",
                "description": "Desk lamp",
                "price": 35.5,
                "category": "Home",
                "stock": 4
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Product = json_body(response.into_body()).await;
    assert_eq!(created.status, ProductStatus::Active);
    assert_eq!(created.created_by, principal(Role::Admin).id);
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(repo.snapshot().await.len(), 4);
}

#[tokio::test]
async fn test_oversized_image_rejected_and_nothing_stored() {
    let repo = scenario_repo();
    let payload = STANDARD.encode(vec![0u8; 11 * 1024 * 1024]);

    let response = app_as(repo.clone(), Role::Admin)
        .oneshot(json_request(
            "POST",
            "/products",
            json!({
                "name": "Poster",
                "description": "Huge",
                "price": 9.0,
                "category": "Art",
                "images": [payload]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "IMAGE_TOO_LARGE");
    assert_eq!(repo.snapshot().await.len(), 3);
}

#[tokio::test]
async fn test_undecodable_image_rejected() {
    let response = app_as(scenario_repo(), Role::Admin)
        .oneshot(json_request(
            "POST",
            "/products",
            json!({
                "name": "Poster",
                "description": "",
                "price": 9.0,
                "category": "Art",
                "images": [STANDARD.encode(b"just some text")]
            }),
        ))
        .await
        .unwrap();

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "IMAGE_DECODE_FAILED");
}

#[tokio::test]
async fn test_partial_update_and_delete() {
    let repo = scenario_repo();
    let shirt_id = repo.snapshot().await[1].id.clone();

    let response = app_as(repo.clone(), Role::Admin)
        .oneshot(json_request(
            "PUT",
            &format!("/products/{}", shirt_id),
            json!({ "price": 25.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.price, 25.0);
    assert_eq!(updated.name, "Shirt");
    assert!(updated.updated_at >= updated.created_at);

    let response = app_as(repo.clone(), Role::Admin)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/products/{}", shirt_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app_as(repo, Role::Admin)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/products/{}", shirt_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_stats_shape() {
    let response = app(scenario_repo())
        .oneshot(get("/categories/stats"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    let stats = body["category_stats"].as_object().unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats["Electronics"]["count"], 1);
    assert_eq!(stats["Electronics"]["avg_price"], 500.0);
    assert_eq!(stats["Fashion"]["max_price"], 20.0);

    let total: u64 = stats.values().map(|s| s["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_categories_list_is_distinct() {
    let response = app(scenario_repo())
        .oneshot(get("/categories"))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["categories"], json!(["Electronics", "Fashion"]));
}
