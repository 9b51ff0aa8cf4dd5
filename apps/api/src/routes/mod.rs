pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::comparison::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // One endpoint per prompt variant; same pipeline behind all of them.
        .route("/api/compare/zero-shot", post(handlers::handle_zero_shot))
        .route("/api/compare/one-shot", post(handlers::handle_one_shot))
        .route("/api/compare/multi-shot", post(handlers::handle_multi_shot))
        .route("/api/compare/system-user", post(handlers::handle_system_user))
        .route(
            "/api/compare/chain-of-thought",
            post(handlers::handle_chain_of_thought),
        )
        .route(
            "/api/compare/structured-output",
            post(handlers::handle_structured_output),
        )
        .route("/api/compare/temperature", post(handlers::handle_temperature))
        .with_state(state)
}
