use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use axum_helpers::{AuthPrincipal, client_ip, extract_cookie, extract_user_agent};
use std::net::SocketAddr;
use uuid::Uuid;

use crate::models::VisitTrack;
use crate::tracker::VisitorTracker;

pub const VISITOR_COOKIE: &str = "visitor_id";
pub const SESSION_COOKIE: &str = "session_id";

const VISITOR_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Page label for a tracked catalog path, with or without the `/api` prefix:
/// `/products` is `products`, `/products/{id}` is `product/{id}`.
pub fn page_for_path(path: &str) -> Option<String> {
    let path = path.strip_prefix("/api").unwrap_or(path);
    let rest = path.strip_prefix("/products")?.trim_end_matches('/');

    if rest.is_empty() {
        return Some("products".to_string());
    }
    let id = rest.strip_prefix('/')?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(format!("product/{}", id))
}

/// Records successful catalog reads. Must run inside the principal
/// middleware so the visit can carry the user id.
pub async fn track_visits(
    State(tracker): State<VisitorTracker>,
    request: Request,
    next: Next,
) -> Response {
    let page = (request.method() == Method::GET)
        .then(|| page_for_path(request.uri().path()))
        .flatten();
    let Some(page) = page else {
        return next.run(request).await;
    };

    let headers = request.headers();
    let known_visitor = extract_cookie(headers, VISITOR_COOKIE);
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let visitor_id = known_visitor
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let mut visit = VisitTrack::new(
        visitor_id.clone(),
        page,
        extract_user_agent(headers).unwrap_or_default(),
        client_ip(headers, peer).unwrap_or_else(|| "unknown".to_string()),
    );
    visit.session_id = extract_cookie(headers, SESSION_COOKIE);
    visit.user_id = request
        .extensions()
        .get::<AuthPrincipal>()
        .map(|p| p.id.clone());

    let mut response = next.run(request).await;
    if !response.status().is_success() {
        return response;
    }

    tracker.track(visit);

    if known_visitor.is_none() {
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax; HttpOnly",
            VISITOR_COOKIE, visitor_id, VISITOR_COOKIE_MAX_AGE
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
