use super::principal::PrincipalResolver;
use crate::audit::extract_cookie;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Cookies checked when no `Authorization` header is present.
pub const TOKEN_COOKIES: [&str; 2] = ["session_token", "access_token"];

/// `Authorization: Bearer <token>`, else one of [`TOKEN_COOKIES`].
pub fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| {
            TOKEN_COOKIES
                .iter()
                .find_map(|name| extract_cookie(headers, name))
        })
}

/// Resolves the caller once per request and stores the
/// [`AuthPrincipal`](super::AuthPrincipal) in the request extensions.
///
/// Anonymous requests pass through untouched; the extractors decide whether
/// a route needs a principal. Resolver failures abort the request.
pub async fn principal_middleware(
    State(resolver): State<Arc<dyn PrincipalResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_request(request.headers()) {
        match resolver.resolve(&token).await {
            Ok(Some(principal)) => {
                tracing::debug!(user_id = %principal.id, "Principal resolved");
                request.extensions_mut().insert(principal);
            }
            Ok(None) => tracing::debug!("Presented token did not resolve to a principal"),
            Err(e) => return e.into_response(),
        }
    }

    next.run(request).await
}
