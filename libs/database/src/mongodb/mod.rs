//! MongoDB connection, readiness probe and index helpers.

mod config;
mod connector;
mod health;
mod indexes;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::check_health;
pub use indexes::{ensure_indexes, keys};

pub use mongodb::{Client, Collection, Database};
