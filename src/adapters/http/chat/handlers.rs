//! HTTP handlers for the chat endpoint.
//!
//! Every `POST` answers 200 with a [`ChatResponse`]; failures travel in the
//! `error` field.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::application::handlers::{
    PlayTurnCommand, PlayTurnHandler, ResetGameHandler, TurnError, TurnReply,
};

use super::dto::{ChatRequest, ChatResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    play_turn_handler: Arc<PlayTurnHandler>,
    reset_handler: Arc<ResetGameHandler>,
}

impl ChatHandlers {
    pub fn new(
        play_turn_handler: Arc<PlayTurnHandler>,
        reset_handler: Arc<ResetGameHandler>,
    ) -> Self {
        Self {
            play_turn_handler,
            reset_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Play a turn or reset the game
///
/// A body whose `reset` is `true` resets even when its other fields do not
/// decode.
pub async fn post_chat(
    State(handlers): State<ChatHandlers>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let value = match body {
        Ok(Json(value)) => value,
        Err(rejection) => return malformed(rejection.body_text()),
    };

    if value.get("reset").and_then(Value::as_bool) == Some(true) {
        return respond(handlers.reset_handler.handle().await);
    }

    let req: ChatRequest = match serde_json::from_value(value) {
        Ok(req) => req,
        Err(e) => return malformed(e.to_string()),
    };

    let reply = handlers
        .play_turn_handler
        .handle(PlayTurnCommand::from(req))
        .await;

    respond(reply)
}

/// GET /api/chat - Health check
pub async fn get_chat() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::ok()))
}

fn malformed(detail: String) -> Response {
    tracing::warn!("Rejected chat request body: {}", detail);
    respond(TurnReply::from_error(&TurnError::MalformedRequest(detail)))
}

fn respond(reply: TurnReply) -> Response {
    (StatusCode::OK, Json(ChatResponse::from(reply))).into_response()
}
