pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::proposals::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Owner API (bearer auth)
        .route(
            "/api/v1/proposals",
            get(handlers::handle_list_proposals).post(handlers::handle_create_proposal),
        )
        .route("/api/v1/proposals/:id", get(handlers::handle_get_proposal))
        .route("/api/v1/proposals/:id/send", post(handlers::handle_mark_sent))
        .route(
            "/api/v1/proposals/:id/revisions",
            post(handlers::handle_log_revision),
        )
        .route("/api/v1/scope-alerts", post(handlers::handle_scope_alert))
        // Public API (signing token is the only credential)
        .route(
            "/api/v1/public/proposals/:token",
            get(handlers::handle_get_public_proposal),
        )
        .route(
            "/api/v1/public/proposals/:token/sign",
            post(handlers::handle_sign_proposal),
        )
        .with_state(state)
}
