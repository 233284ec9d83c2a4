//! API routes module

pub mod admin;
pub mod health;

use axum::{Router, middleware};
use axum_helpers::principal_middleware;
use domain_products::{ImagePolicy, ProductRepository, ProductService};
use domain_users::{AuthStrategy, UserRepository, UserService};
use domain_visitors::{VisitorRepository, VisitorService, VisitorTracker, track_visits};
use std::sync::Arc;

use crate::state::AppState;
use admin::Analytics;

/// Everything the routes read from or write to.
pub struct Backends<P, U: UserRepository, V> {
    pub products: Arc<P>,
    pub users: Arc<U>,
    pub visitors: Arc<V>,
    pub images: ImagePolicy,
    pub auth: AuthStrategy<U>,
    pub tracker: VisitorTracker,
}

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    compose(Backends {
        products: state.products.clone(),
        users: state.users.clone(),
        visitors: state.visitors.clone(),
        images: ImagePolicy::new(state.config.images.clone()),
        auth: state.auth.clone(),
        tracker: state.tracker.clone(),
    })
}

/// The principal is resolved before visits are tracked so that tracked
/// views carry the user id.
pub fn compose<P, U, V>(backends: Backends<P, U, V>) -> Router
where
    P: ProductRepository + 'static,
    U: UserRepository + 'static,
    V: VisitorRepository + 'static,
{
    let products = ProductService::from_shared(backends.products, backends.images);
    let users = UserService::from_shared(backends.users);
    let dashboard = Analytics {
        products: products.clone(),
        users: users.clone(),
        visitors: VisitorService::new(backends.visitors),
    };

    Router::new()
        .merge(domain_products::handlers::router(products))
        .merge(domain_users::handlers::router(users))
        .merge(backends.auth.router())
        .merge(admin::router(dashboard))
        .layer(middleware::from_fn_with_state(
            backends.tracker,
            track_visits,
        ))
        .layer(middleware::from_fn_with_state(
            backends.auth.resolver(),
            principal_middleware,
        ))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let products = state.products.init_indexes().await?;
    let users = state.users.init_indexes().await?;
    let visitors = state.visitors.init_indexes().await?;

    tracing::info!(
        products = products.len(),
        users = users.len(),
        visitors = visitors.len(),
        "Indexes ensured"
    );
    Ok(())
}
