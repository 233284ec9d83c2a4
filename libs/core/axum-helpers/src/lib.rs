//! # Axum Helpers
//!
//! Shared HTTP plumbing for the storefront services.
//!
//! - **[`auth`]**: pluggable principal resolution and role extractors
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: validated JSON bodies
//! - **[`audit`]**: audit events and request origin helpers
//!
//! ```ignore
//! use axum_helpers::server::{create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! ```

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    AdminPrincipal, AuthPrincipal, CurrentPrincipal, JwtClaims, JwtCodec, JwtConfig,
    MaybePrincipal, PrincipalResolver, Role, principal_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::ValidatedJson;

pub use audit::{
    AuditEvent, AuditOutcome, client_ip, extract_cookie, extract_ip_from_headers,
    extract_user_agent,
};
