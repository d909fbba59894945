use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Challenge lifecycle
        .route("/challenges", post(handlers::create_challenge))
        .route(
            "/challenges/:id",
            get(handlers::get_challenge).delete(handlers::discard_challenge),
        )
        // Editing
        .route(
            "/challenges/:id/statements/:index",
            put(handlers::set_statement_text),
        )
        .route("/challenges/:id/lie", put(handlers::select_lie))
        // Recording
        .route(
            "/challenges/:id/statements/:index/record",
            post(handlers::record_statement),
        )
        .route(
            "/challenges/:id/recording/cancel",
            post(handlers::cancel_recording),
        )
        // Review and submission
        .route("/challenges/:id/preview", post(handlers::preview_challenge))
        .route("/challenges/:id/edit", post(handlers::back_to_edit))
        .route("/challenges/:id/confirm", post(handlers::confirm_challenge))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
