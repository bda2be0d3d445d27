use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::{extract_session_token as session_id, SESSION_COOKIE},
    models::session::{Role, Session},
    services::auth as auth_service,
    state::AppState,
};

/// The request payload for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Describes the caller's current session.
#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub can_view_history: bool,
}

/// Creates a session cookie valid for `max_age_hours`.
fn create_session_cookie(value: String, max_age_hours: i64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);
    cookie.set_http_only(true);
    if secure {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::hours(max_age_hours));
    cookie.set_path("/");
    cookie
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: std::result::Result<Json<LoginRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    tracing::info!("🔐 Login attempt for: {}", payload.username);

    let session = auth_service::authenticate(&state.credentials, &payload.username, &payload.password)?;
    let Session::Authenticated(identity) = session else {
        return Err(AppError::Internal("authentication yielded no identity".to_string()));
    };

    if let Some(previous) = session_id(&cookies) {
        state.sessions.destroy(&previous).await;
    }

    let new_session_id = state.sessions.create(identity.clone()).await;
    cookies.add(create_session_cookie(
        new_session_id.to_string(),
        state.config.session_duration_hours,
        state.config.secure_cookies,
    ));
    tracing::debug!("✅ Session cookie added for {}", identity.username);

    let response = AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        username: Some(identity.username),
        role: Some(identity.role),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles logout. Succeeds whether or not a session is live.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    if let Some(id) = session_id(&cookies) {
        let session = state.sessions.load(&id).await;
        state.sessions.destroy(&id).await;
        auth_service::logout(session);
    }

    let mut session_cookie = Cookie::new(SESSION_COOKIE, "");
    session_cookie.set_max_age(Duration::seconds(0));
    session_cookie.set_path("/");
    cookies.remove(session_cookie);

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
        username: None,
        role: None,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Reports the caller's current session.
#[axum::debug_handler]
pub async fn current_session(State(state): State<AppState>, cookies: Cookies) -> Json<SessionResponse> {
    let session = match session_id(&cookies) {
        Some(id) => state.sessions.load(&id).await,
        None => Session::Anonymous,
    };

    let identity = session.identity();
    Json(SessionResponse {
        authenticated: session.is_authenticated(),
        username: identity.map(|i| i.username.clone()),
        role: identity.map(|i| i.role),
        can_view_history: identity.is_some_and(|i| i.role.can_view_history()),
    })
}
