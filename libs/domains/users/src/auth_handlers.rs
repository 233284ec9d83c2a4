//! Login and logout endpoints. Only the router of the configured strategy is
//! mounted.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, MaybePrincipal,
    errors::responses::{BadGatewayResponse, BadRequestValidationResponse, UnauthorizedResponse},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::UserResult;
use crate::jwt::{JwtStrategy, MobileLoginRequest, TokenLoginResponse};
use crate::oauth::OAuthCallbackParams;
use crate::repository::UserRepository;
use crate::session::{SessionLoginRequest, SessionLoginResponse, SessionStrategy};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn logged_out() -> Json<Self> {
        Json(Self {
            message: "Logged out successfully".to_string(),
        })
    }
}

fn audit_login(user_id: Option<String>, ok: bool, headers: &HeaderMap) {
    let outcome = if ok {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(user_id, "auth.login", None, outcome)
        .with_request(headers)
        .log();
}

pub fn session_router<R: UserRepository + 'static>(strategy: Arc<SessionStrategy<R>>) -> Router {
    Router::new()
        .route("/auth/session", post(session_login))
        .route("/auth/logout", post(session_logout))
        .with_state(strategy)
}

pub fn jwt_router<R: UserRepository + 'static>(strategy: Arc<JwtStrategy<R>>) -> Router {
    Router::new()
        .route("/auth/google", get(google_authorize))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/google/mobile", post(google_mobile))
        .route("/auth/logout", post(token_logout))
        .with_state(strategy)
}

/// Exchange a session id from the auth service for a session token
#[utoipa::path(
    post,
    path = "/auth/session",
    tag = "Auth",
    request_body = SessionLoginRequest,
    responses(
        (status = 200, description = "Session issued", body = SessionLoginResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
pub(crate) async fn session_login<R: UserRepository>(
    State(strategy): State<Arc<SessionStrategy<R>>>,
    headers: HeaderMap,
    Json(input): Json<SessionLoginRequest>,
) -> UserResult<Json<SessionLoginResponse>> {
    let result = strategy.login(&input.session_id).await;
    audit_login(
        result.as_ref().ok().map(|r| r.user.id.clone()),
        result.is_ok(),
        &headers,
    );
    Ok(Json(result?))
}

/// Clear the caller's session. Anonymous callers get the same answer.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub(crate) async fn session_logout<R: UserRepository>(
    State(strategy): State<Arc<SessionStrategy<R>>>,
    MaybePrincipal(principal): MaybePrincipal,
) -> UserResult<Json<MessageResponse>> {
    if let Some(principal) = principal {
        strategy.logout(&principal.id).await?;
    }
    Ok(MessageResponse::logged_out())
}

/// Redirect to Google consent (PKCE)
#[utoipa::path(
    get,
    path = "/auth/google",
    tag = "Auth",
    responses((status = 303, description = "Redirect to Google"))
)]
pub(crate) async fn google_authorize<R: UserRepository>(
    State(strategy): State<Arc<JwtStrategy<R>>>,
) -> UserResult<Redirect> {
    let url = strategy.authorize_url().await?;
    Ok(Redirect::to(&url))
}

/// Google redirect target; forwards to the frontend with `token` or `error`
#[utoipa::path(
    get,
    path = "/auth/google/callback",
    tag = "Auth",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "State issued by /auth/google"),
        ("error" = Option<String>, Query, description = "Set when consent was denied")
    ),
    responses((status = 303, description = "Redirect to the frontend"))
)]
pub(crate) async fn google_callback<R: UserRepository>(
    State(strategy): State<Arc<JwtStrategy<R>>>,
    Query(params): Query<OAuthCallbackParams>,
) -> UserResult<Redirect> {
    let url = strategy.callback_redirect(params).await?;
    Ok(Redirect::to(&url))
}

/// Trade a Google access token held by a mobile client for a bearer token
#[utoipa::path(
    post,
    path = "/auth/google/mobile",
    tag = "Auth",
    request_body = MobileLoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenLoginResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
pub(crate) async fn google_mobile<R: UserRepository>(
    State(strategy): State<Arc<JwtStrategy<R>>>,
    headers: HeaderMap,
    Json(input): Json<MobileLoginRequest>,
) -> UserResult<Json<TokenLoginResponse>> {
    let result = strategy.mobile_login(&input.access_token).await;
    audit_login(
        result.as_ref().ok().map(|r| r.user.id.clone()),
        result.is_ok(),
        &headers,
    );
    Ok(Json(result?))
}

/// Bearer tokens are stateless; the client drops its copy.
pub(crate) async fn token_logout() -> Json<MessageResponse> {
    MessageResponse::logged_out()
}
