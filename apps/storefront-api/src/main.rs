//! Storefront API - catalog, accounts and visitor analytics over REST

use axum_helpers::server::{ShutdownCoordinator, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::MongoProductRepository;
use domain_users::{AuthStrategy, MongoUserRepository};
use domain_visitors::{MongoVisitorRepository, visitor_channel};
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url());

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let users = Arc::new(MongoUserRepository::new(&db));
    let visitors = Arc::new(MongoVisitorRepository::new(&db));
    let auth = AuthStrategy::from_config(config.auth.clone(), users.clone());
    info!(strategy = %auth.kind(), "Authentication strategy selected");

    let (coordinator, _) = ShutdownCoordinator::new();
    let (tracker, worker) = visitor_channel(visitors.clone(), &config.visitors);
    let worker_handle = tokio::spawn(worker.run(coordinator.subscribe()));

    let state = AppState {
        config: config.clone(),
        mongo_client,
        db: db.clone(),
        products: Arc::new(MongoProductRepository::new(&db)),
        users,
        visitors,
        auth,
        tracker,
    };

    api::init_indexes(&state).await?;

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.db.clone()));

    info!("Starting Storefront API on port {}", state.config.server.port);

    let server_config = state.config.server.clone();
    let AppState {
        mongo_client,
        tracker,
        ..
    } = state;

    let result = create_production_app(app, &server_config, coordinator, async move {
        info!("Shutting down: flushing visitor tracks");
        drop(tracker);
        if let Err(e) = worker_handle.await {
            tracing::error!(error = %e, "Visitor worker panicked");
        }
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await;

    result.map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Storefront API shutdown complete");
    Ok(())
}
