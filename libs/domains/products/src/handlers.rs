//! HTTP handlers for the catalog API

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestFilterResponse, BadRequestImageResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    AdminPrincipal, AuditEvent, AuditOutcome, ValidatedJson,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductStatus, UpdateProduct};
use crate::query::{ProductListParams, SortOrder};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::stats::{CategoryStatSummary, CategoryStatsResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product,
        create_product,
        update_product,
        delete_product,
        list_categories,
        category_stats,
    ),
    components(
        schemas(
            Product, CreateProduct, UpdateProduct, ProductStatus, SortOrder,
            CategoriesResponse, CategoryStatsResponse, CategoryStatSummary
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestImageResponse,
            BadRequestFilterResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Catalog browsing and admin product management"),
        (name = "Categories", description = "Category labels and price statistics")
    )
)]
pub struct ApiDoc;

/// Request body cap for product writes. Images travel base64-encoded inside
/// the JSON body, so this sits well above the per-image limit.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/categories", get(list_categories))
        .route("/categories/stats", get(category_stats))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(shared_service)
}

/// List active products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductListParams),
    responses(
        (status = 200, description = "Matching active products", body = Vec<Product>),
        (status = 400, response = BadRequestFilterResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(params): Query<ProductListParams>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products(params).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(&id).await?;
    Ok(Json(product))
}

/// Create a product (admin)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestImageResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminPrincipal(admin): AdminPrincipal,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let result = service.create_product(input, &admin.id).await;

    let (outcome, resource) = match &result {
        Ok(product) => (AuditOutcome::Success, Some(format!("product:{}", product.id))),
        Err(_) => (AuditOutcome::Failure, None),
    };
    AuditEvent::new(Some(admin.id.clone()), "product.create", resource, outcome)
        .with_request(&headers)
        .log();

    Ok((StatusCode::CREATED, Json(result?)))
}

/// Partially update a product (admin)
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestImageResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminPrincipal(admin): AdminPrincipal,
    Path(id): Path<String>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let result = service.update_product(&id, input).await;

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(
        Some(admin.id.clone()),
        "product.update",
        Some(format!("product:{}", id)),
        outcome,
    )
    .with_request(&headers)
    .log();

    Ok(Json(result?))
}

/// Delete a product (admin)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminPrincipal(admin): AdminPrincipal,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ProductResult<StatusCode> {
    let result = service.delete_product(&id).await;

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(
        Some(admin.id.clone()),
        "product.delete",
        Some(format!("product:{}", id)),
        outcome,
    )
    .with_request(&headers)
    .log();

    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// Distinct category labels
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "Category labels", body = CategoriesResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<CategoriesResponse>> {
    let categories = service.categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// Per-category count and price figures over active products
#[utoipa::path(
    get,
    path = "/categories/stats",
    tag = "Categories",
    responses(
        (status = 200, description = "Statistics keyed by category, largest first", body = CategoryStatsResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_stats<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<CategoryStatsResponse>> {
    let category_stats = service.category_stats().await?;
    Ok(Json(CategoryStatsResponse { category_stats }))
}
