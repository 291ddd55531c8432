//! HTTP DTOs for the chat endpoint.
//!
//! These types decouple the wire format from the application types.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{PlayTurnCommand, TurnReply};
use crate::domain::game::Turn;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of a `POST /api/chat` game turn.
///
/// `reset: true` bodies are routed before this type is decoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<Turn>>,
}

impl From<ChatRequest> for PlayTurnCommand {
    fn from(req: ChatRequest) -> Self {
        Self {
            message: req.message,
            history: req.history.unwrap_or_default(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of every `POST /api/chat` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_messages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl From<TurnReply> for ChatResponse {
    fn from(reply: TurnReply) -> Self {
        Self {
            reply: reply.reply,
            additional_messages: reply.additional,
            win: reply.win,
            error: reply.error,
            reset: reply.reset.then_some(true),
            debug: reply.debug,
        }
    }
}

/// Body of `GET /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "API route is working".to_string(),
        }
    }
}
