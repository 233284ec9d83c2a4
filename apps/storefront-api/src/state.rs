//! Application state management

use domain_products::MongoProductRepository;
use domain_users::{AuthStrategy, MongoUserRepository};
use domain_visitors::{MongoVisitorRepository, VisitorTracker};
use mongodb::{Client, Database};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
    pub products: Arc<MongoProductRepository>,
    pub users: Arc<MongoUserRepository>,
    pub visitors: Arc<MongoVisitorRepository>,
    pub auth: AuthStrategy<MongoUserRepository>,
    pub tracker: VisitorTracker,
}
