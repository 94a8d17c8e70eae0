pub mod health;
pub mod persons;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};

use crate::agent::handlers as chat_handlers;
use crate::intake;
use crate::state::AppState;

/// Uploaded resumes are small; anything past this is a client mistake.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile intake
        .route("/api/v1/profiles", post(intake::handle_upload))
        .route(
            "/api/v1/profiles/extract-links",
            post(intake::handle_extract_links),
        )
        // Stored bundles
        .route("/api/v1/persons", get(persons::handle_list_persons))
        .route("/api/v1/persons/:name", get(persons::handle_get_person))
        // Chat agent
        .route("/api/v1/chat", post(chat_handlers::handle_chat))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
