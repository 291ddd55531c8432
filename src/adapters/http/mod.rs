//! HTTP adapters - Axum routes exposing the application handlers.
//!
//! - `chat` - `POST /api/chat` game turns and resets, `GET /api/chat` health

pub mod chat;

pub use chat::{chat_routes, ChatHandlers};
