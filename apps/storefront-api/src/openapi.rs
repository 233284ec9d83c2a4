//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Storefront API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Catalog, accounts and storefront analytics",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8001", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_products::ApiDoc),
        (path = "/api", api = domain_users::ApiDoc),
        (path = "/api", api = crate::api::admin::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Catalog browsing and admin product management"),
        (name = "Auth", description = "Login, logout and the current principal"),
        (name = "Admin", description = "Administration and analytics")
    )
)]
pub struct ApiDoc;
