//! Products Domain
//!
//! Catalog listing with filters and sort orders, admin CRUD with image
//! ingestion, and per-category price statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, admin checks, audit
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, image policy, query building
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, DTOs, stats
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     images::ImagePolicy,
//!     mongodb::MongoProductRepository,
//!     service::ProductService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("storefront");
//!
//! let repository = MongoProductRepository::new(&db);
//! let service = ProductService::new(repository, ImagePolicy::default());
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod images;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;
pub mod stats;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use images::{ImagePolicy, ImagePolicyConfig};
pub use memory::InMemoryProductRepository;
pub use models::{CreateProduct, Product, ProductStatus, UpdateProduct};
pub use mongodb::MongoProductRepository;
pub use query::{ProductListParams, ProductQuery, SortOrder};
pub use repository::ProductRepository;
pub use service::ProductService;
pub use stats::{CategoryStats, CategoryStatsResponse};
