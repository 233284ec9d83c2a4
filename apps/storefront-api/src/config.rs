//! Configuration for the Storefront API

use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_products::ImagePolicyConfig;
use domain_users::AuthConfig;
use domain_visitors::VisitorConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub images: ImagePolicyConfig,
    pub auth: AuthConfig,
    pub visitors: VisitorConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            mongodb: MongoConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            images: ImagePolicyConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            visitors: VisitorConfig::from_env()?,
        })
    }
}
