//! Visitors Domain
//!
//! Records catalog page views without slowing down the request path and
//! answers the aggregate questions the admin dashboard asks.
//!
//! ```rust,ignore
//! let repo = Arc::new(MongoVisitorRepository::new(&db));
//! let (tracker, worker) = visitor_channel(repo.clone(), &VisitorConfig::from_env()?);
//! tokio::spawn(worker.run(shutdown.subscribe()));
//!
//! let api = api.layer(axum::middleware::from_fn_with_state(tracker, track_visits));
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod middleware;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod tracker;

pub use config::VisitorConfig;
pub use error::{VisitorError, VisitorResult};
pub use memory::InMemoryVisitorRepository;
pub use middleware::{page_for_path, track_visits};
pub use models::{PageViews, VisitTrack, VisitorTotals};
pub use mongodb::MongoVisitorRepository;
pub use repository::VisitorRepository;
pub use service::VisitorService;
pub use tracker::{VisitorTracker, VisitorWorker, visitor_channel};
