//! Profile and account administration endpoints, shared by both auth
//! strategies.

use axum::{Json, Router, extract::State, http::HeaderMap, routing::get};
use axum_helpers::{
    AdminPrincipal, AuditEvent, AuditOutcome, CurrentPrincipal, ValidatedJson,
    errors::responses::{
        BadGatewayResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::auth_handlers::{self, MessageResponse};
use crate::error::UserResult;
use crate::jwt::{MobileLoginRequest, TokenLoginResponse};
use crate::models::{AuthProvider, UpdateProfile, UserProfile};
use crate::repository::UserRepository;
use crate::service::UserService;
use crate::session::{SessionLoginRequest, SessionLoginResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        me,
        get_profile,
        update_profile,
        list_users,
        auth_handlers::session_login,
        auth_handlers::session_logout,
        auth_handlers::google_authorize,
        auth_handlers::google_callback,
        auth_handlers::google_mobile,
    ),
    components(
        schemas(
            UserProfile, UpdateProfile, AuthProvider, axum_helpers::Role,
            SessionLoginRequest, SessionLoginResponse,
            MobileLoginRequest, TokenLoginResponse, MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            BadGatewayResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Login, logout and the current principal"),
        (name = "Profile", description = "Self-service profile"),
        (name = "Admin", description = "Account administration")
    )
)]
pub struct ApiDoc;

pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/auth/me", get(me))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/admin/users", get(list_users))
        .with_state(shared_service)
}

/// The authenticated account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current account", body = UserProfile),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn me<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> UserResult<Json<UserProfile>> {
    Ok(Json(service.get_profile(&principal.id).await?))
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Current profile", body = UserProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> UserResult<Json<UserProfile>> {
    Ok(Json(service.get_profile(&principal.id).await?))
}

/// Rename the current account
#[utoipa::path(
    put,
    path = "/profile",
    tag = "Profile",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn update_profile<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<UpdateProfile>,
) -> UserResult<Json<UserProfile>> {
    let result = service.update_profile(&principal.id, input).await;

    let outcome = if result.is_ok() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(
        Some(principal.id.clone()),
        "profile.update",
        Some(format!("user:{}", principal.id)),
        outcome,
    )
    .with_request(&headers)
    .log();

    Ok(Json(result?))
}

/// All accounts, newest first (admin)
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "Accounts", body = Vec<UserProfile>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> UserResult<Json<Vec<UserProfile>>> {
    Ok(Json(service.list_users().await?))
}
