use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{models::session::Session, state::AppState};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "session_id";

/// Extracts the session token from the request cookies.
///
/// # Arguments
///
/// * `cookies` - The request cookies.
///
/// # Returns
///
/// An `Option` containing the session ID if found.
pub fn extract_session_token(cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// A middleware that requires a live session.
///
/// On success the authenticated `Session` is inserted into the request
/// extensions for the handler.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response` or an error `StatusCode`.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    tracing::debug!("🔐 Checking authentication...");

    let session_id = extract_session_token(&cookies).ok_or_else(|| {
        tracing::warn!("❌ No session_id cookie found");
        StatusCode::UNAUTHORIZED
    })?;

    let session = state.sessions.load(&session_id).await;
    let Session::Authenticated(ref identity) = session else {
        tracing::warn!("❌ Unknown or expired session: {}", session_id);
        return Err(StatusCode::UNAUTHORIZED);
    };

    tracing::debug!("✅ User authenticated: {}", identity.username);

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
