//! Adapters - Implementations of ports for external systems.
//!
//! - `ai` - Completion providers (OpenAI-compatible, mock)
//! - `http` - Axum routes for the chat endpoint

pub mod ai;
pub mod http;
