//! Storefront analytics for administrators

use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::{
    AdminPrincipal, AppError,
    errors::responses::{ForbiddenResponse, InternalServerErrorResponse, UnauthorizedResponse},
};
use domain_products::{ProductRepository, ProductService, ProductStatus};
use domain_users::{UserRepository, UserService};
use domain_visitors::{PageViews, VisitorRepository, VisitorService, VisitorTotals};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserTotals {
    pub total: u64,
    pub admins: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductTotals {
    pub total: u64,
    pub active: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub visitors: VisitorTotals,
    pub page_views: Vec<PageViews>,
    pub users: UserTotals,
    pub products: ProductTotals,
}

#[derive(OpenApi)]
#[openapi(
    paths(analytics),
    components(
        schemas(AnalyticsResponse, UserTotals, ProductTotals, VisitorTotals, PageViews),
        responses(UnauthorizedResponse, ForbiddenResponse, InternalServerErrorResponse)
    ),
    tags((name = "Admin", description = "Administration and analytics"))
)]
pub struct ApiDoc;

/// Read services the dashboard aggregates over.
pub struct Analytics<P: ProductRepository, U: UserRepository, V: VisitorRepository> {
    pub products: ProductService<P>,
    pub users: UserService<U>,
    pub visitors: VisitorService<V>,
}

pub fn router<P, U, V>(dashboard: Analytics<P, U, V>) -> Router
where
    P: ProductRepository + 'static,
    U: UserRepository + 'static,
    V: VisitorRepository + 'static,
{
    Router::new()
        .route("/admin/analytics", get(analytics))
        .with_state(Arc::new(dashboard))
}

/// Visitor, account and catalog totals
#[utoipa::path(
    get,
    path = "/admin/analytics",
    tag = "Admin",
    responses(
        (status = 200, description = "Dashboard figures", body = AnalyticsResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn analytics<P, U, V>(
    State(analytics): State<Arc<Analytics<P, U, V>>>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> Result<Json<AnalyticsResponse>, AppError>
where
    P: ProductRepository,
    U: UserRepository,
    V: VisitorRepository,
{
    let visitors = analytics.visitors.totals().await?;
    let page_views = analytics.visitors.page_views().await?;
    let users = UserTotals {
        total: analytics.users.count_users().await?,
        admins: analytics.users.count_admins().await?,
    };
    let products = ProductTotals {
        total: analytics.products.count_products(None).await?,
        active: analytics
            .products
            .count_products(Some(ProductStatus::Active))
            .await?,
    };

    Ok(Json(AnalyticsResponse {
        visitors,
        page_views,
        users,
        products,
    }))
}
