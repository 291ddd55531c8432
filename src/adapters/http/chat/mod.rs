//! HTTP adapter for the chat endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, HealthResponse};
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
