use axum::{
    Router,
    routing::{get, post},
    middleware::from_fn_with_state,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/session", get(handlers::auth::current_session))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route(
            "/api/predictions",
            post(handlers::predictions::submit_prediction)
                .get(handlers::predictions::list_predictions),
        )
        .route(
            "/api/predictions/export",
            get(handlers::predictions::export_predictions),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .fallback_service(ServeDir::new(&state.config.static_dir))
}
