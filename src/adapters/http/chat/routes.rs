//! HTTP routes for the chat endpoint.

use axum::{routing::get, Router};

use super::handlers::{get_chat, post_chat, ChatHandlers};

/// Creates the chat router.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/api/chat", get(get_chat).post(post_chat))
        .with_state(handlers)
}
