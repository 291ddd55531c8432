//! PlayTurn command handler.
//!
//! Runs one turn of the game: input checks, analysis of the conversation so
//! far, a staged system prompt, one completion, win detection on both sides
//! and segmentation of the reply into a message burst.

use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::game::replies::{
    pick_fallback, EMPTY_INPUT_REPLY, FALLBACK_REPLIES, MALFORMED_REQUEST_REPLY,
    MISSING_CREDENTIAL_REPLY, WIN_REPLY,
};
use crate::domain::game::{analyze, compose_system_prompt, matched_phrase, segment, Turn, TurnRole};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, FinishReason, Message, RequestMetadata,
};

/// Shown next to the missing-credential reply in development.
const MISSING_CREDENTIAL_HINT: &str = "Please set CHECKMATE__AI__API_KEY or XAI_API_KEY";

/// Command to play one turn.
#[derive(Debug, Clone, Default)]
pub struct PlayTurnCommand {
    /// The user's new message. `None` when the client sent none.
    pub message: Option<String>,
    /// Prior turns, oldest first. Does not include `message`.
    pub history: Vec<Turn>,
}

impl PlayTurnCommand {
    pub fn new(message: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            message: Some(message.into()),
            history,
        }
    }
}

/// Reasons a turn is answered with a literal instead of a model reply.
///
/// The display text is the `error` annotation sent to the client.
#[derive(Debug, Clone, Error)]
pub enum TurnError {
    /// Message absent, empty or whitespace only.
    #[error("No message provided")]
    EmptyInput,

    /// No API key configured, so no provider exists.
    #[error("Missing API key in server configuration")]
    MissingCredential,

    /// The completion call failed.
    #[error("API error: {0}")]
    ProviderFailure(#[from] AIError),

    /// The request body could not be decoded.
    #[error("JSON parse error")]
    MalformedRequest(String),
}

/// The structured reply to one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReply {
    /// First message of the burst.
    pub reply: String,
    /// Follow-up messages. `Some` only for turns that reached the model.
    pub additional: Option<Vec<String>>,
    /// `Some` when a win check ran to completion.
    pub win: Option<bool>,
    pub error: Option<String>,
    pub debug: Option<String>,
    pub reset: bool,
}

impl TurnReply {
    /// Reply for a turn that ends before or without a usable completion.
    pub fn from_error(err: &TurnError) -> Self {
        let reply = match err {
            TurnError::EmptyInput => EMPTY_INPUT_REPLY,
            TurnError::MissingCredential => MISSING_CREDENTIAL_REPLY,
            TurnError::MalformedRequest(_) => MALFORMED_REQUEST_REPLY,
            // The handler draws a random fallback instead.
            TurnError::ProviderFailure(_) => FALLBACK_REPLIES[0],
        };
        Self {
            reply: reply.to_string(),
            error: Some(err.to_string()),
            ..Default::default()
        }
    }

    fn won_by_input() -> Self {
        Self {
            reply: WIN_REPLY.to_string(),
            win: Some(true),
            ..Default::default()
        }
    }

    /// Every message in delivery order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.reply.as_str())
            .chain(self.additional.iter().flatten().map(String::as_str))
    }
}

/// Completion settings applied to every turn.
#[derive(Debug, Clone)]
pub struct PlayTurnSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Adds configuration hints to error replies.
    pub dev_mode: bool,
}

impl Default for PlayTurnSettings {
    fn default() -> Self {
        Self {
            max_tokens: 250,
            temperature: 0.8,
            dev_mode: false,
        }
    }
}

/// Handler for PlayTurn commands.
pub struct PlayTurnHandler {
    provider: Option<Arc<dyn AIProvider>>,
    settings: PlayTurnSettings,
    rng: Mutex<StdRng>,
}

impl PlayTurnHandler {
    /// Creates a handler. `provider` is `None` when no credential is configured.
    pub fn new(
        provider: Option<Arc<dyn AIProvider>>,
        settings: PlayTurnSettings,
        rng: StdRng,
    ) -> Self {
        Self {
            provider,
            settings,
            rng: Mutex::new(rng),
        }
    }

    /// Handles one turn. Never fails; every outcome is a reply.
    pub async fn handle(&self, cmd: PlayTurnCommand) -> TurnReply {
        let turn_id = Uuid::new_v4();
        let span = tracing::info_span!("chat_turn", %turn_id);

        self.play(cmd, turn_id).instrument(span).await
    }

    async fn play(&self, cmd: PlayTurnCommand, turn_id: Uuid) -> TurnReply {
        let message = match cmd.message.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => {
                tracing::debug!("Empty message received");
                return TurnReply::from_error(&TurnError::EmptyInput);
            }
        };

        if let Some(phrase) = matched_phrase(&message) {
            tracing::info!(phrase, "Win phrase in user message");
            return TurnReply::won_by_input();
        }

        let Some(provider) = self.provider.as_ref() else {
            tracing::error!("No completion provider configured");
            let mut reply = TurnReply::from_error(&TurnError::MissingCredential);
            if self.settings.dev_mode {
                reply.debug = Some(MISSING_CREDENTIAL_HINT.to_string());
            }
            return reply;
        };

        let message_count = cmd.history.len();
        let mut turns = cmd.history;
        turns.push(Turn::user(message));

        let analysis = analyze(&turns);
        tracing::debug!(message_count, "{}", analysis);
        let system_prompt = compose_system_prompt(message_count, &analysis);

        let request = CompletionRequest::new(RequestMetadata::new(turn_id.to_string()))
            .with_system_prompt(system_prompt)
            .with_messages(turns.iter().map(to_ai_message))
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);

        let content = match provider.complete(request).await {
            Ok(response) => {
                tracing::debug!(
                    model = %response.model,
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    total_tokens = response.usage.total_tokens,
                    "Completion received"
                );
                if response.finish_reason == FinishReason::Length {
                    tracing::warn!(
                        max_tokens = self.settings.max_tokens,
                        "Completion cut off at the token limit"
                    );
                }
                response.content.trim().to_string()
            }
            Err(err) => {
                tracing::warn!(
                    provider = %provider.provider_info().name,
                    "Completion failed: {}",
                    err
                );
                return self.fallback(Some(TurnError::from(err)));
            }
        };

        if content.is_empty() {
            tracing::warn!("Completion was empty");
            return self.fallback(None);
        }

        let won = matched_phrase(&content).is_some();
        if won {
            tracing::info!("Win phrase in model reply");
        }

        let segmented = self.with_rng(|rng| segment(&content, rng));
        tracing::debug!(messages = segmented.message_count(), "Reply segmented");

        TurnReply {
            reply: segmented.primary,
            additional: Some(segmented.additional),
            win: Some(won),
            ..Default::default()
        }
    }

    fn fallback(&self, err: Option<TurnError>) -> TurnReply {
        let reply = self.with_rng(|rng| pick_fallback(rng)).to_string();
        TurnReply {
            reply,
            error: err.map(|e| e.to_string()),
            ..Default::default()
        }
    }

    /// Runs `f` with the shared RNG. The lock is released before returning.
    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

fn to_ai_message(turn: &Turn) -> Message {
    match turn.role {
        TurnRole::User => Message::user(&turn.content),
        TurnRole::Assistant => Message::assistant(&turn.content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::ports::MessageRole;
    use rand::SeedableRng;

    fn handler_with(provider: &MockAIProvider) -> PlayTurnHandler {
        PlayTurnHandler::new(
            Some(Arc::new(provider.clone())),
            PlayTurnSettings::default(),
            StdRng::seed_from_u64(3),
        )
    }

    fn without_provider(dev_mode: bool) -> PlayTurnHandler {
        PlayTurnHandler::new(
            None,
            PlayTurnSettings {
                dev_mode,
                ..Default::default()
            },
            StdRng::seed_from_u64(3),
        )
    }

    mod input_checks {
        use super::*;

        #[tokio::test]
        async fn missing_message_is_empty_input() {
            let provider = MockAIProvider::new();
            let reply = handler_with(&provider).handle(PlayTurnCommand::default()).await;

            assert_eq!(reply.reply, EMPTY_INPUT_REPLY);
            assert_eq!(reply.error.as_deref(), Some("No message provided"));
            assert_eq!(provider.call_count(), 0);
        }

        #[tokio::test]
        async fn whitespace_message_is_empty_input() {
            let provider = MockAIProvider::new();
            let reply = handler_with(&provider)
                .handle(PlayTurnCommand::new("   \n", vec![]))
                .await;

            assert_eq!(reply.reply, EMPTY_INPUT_REPLY);
            assert_eq!(provider.call_count(), 0);
        }

        #[tokio::test]
        async fn win_phrase_short_circuits() {
            let provider = MockAIProvider::new();
            let reply = handler_with(&provider)
                .handle(PlayTurnCommand::new("You Understand Me", vec![]))
                .await;

            assert_eq!(reply.reply, WIN_REPLY);
            assert_eq!(reply.win, Some(true));
            assert!(reply.error.is_none());
            assert_eq!(provider.call_count(), 0);
        }

        #[tokio::test]
        async fn win_check_runs_before_credential_check() {
            let reply = without_provider(false)
                .handle(PlayTurnCommand::new("i trust you", vec![]))
                .await;
            assert_eq!(reply.win, Some(true));
        }

        #[tokio::test]
        async fn missing_credential_reply() {
            let reply = without_provider(false)
                .handle(PlayTurnCommand::new("hello", vec![]))
                .await;

            assert_eq!(reply.reply, MISSING_CREDENTIAL_REPLY);
            assert!(reply.error.unwrap().contains("Missing API key"));
            assert!(reply.win.is_none());
            assert!(reply.debug.is_none());
        }

        #[tokio::test]
        async fn missing_credential_hint_in_dev_mode() {
            let reply = without_provider(true)
                .handle(PlayTurnCommand::new("hello", vec![]))
                .await;
            assert_eq!(reply.debug.as_deref(), Some(MISSING_CREDENTIAL_HINT));
        }
    }

    mod completion {
        use super::*;

        #[tokio::test]
        async fn sends_prompt_history_and_current_message() {
            let provider = MockAIProvider::new().with_response("hello.");
            let history = vec![Turn::user("hi"), Turn::assistant("hello there.")];
            handler_with(&provider)
                .handle(PlayTurnCommand::new("  who are you?  ", history))
                .await;

            let calls = provider.get_calls();
            assert_eq!(calls.len(), 1);
            let request = &calls[0];
            let roles: Vec<_> = request.messages.iter().map(|m| m.role).collect();
            assert_eq!(
                roles,
                vec![MessageRole::User, MessageRole::Assistant, MessageRole::User]
            );
            assert_eq!(request.messages[2].content, "who are you?");
            assert_eq!(request.max_tokens, Some(250));
            assert_eq!(request.temperature, Some(0.8));

            let prompt = request.system_prompt.as_deref().unwrap();
            assert!(prompt.contains("CURRENT CONVERSATION CONTEXT:"));
        }

        #[tokio::test]
        async fn stage_follows_history_length() {
            let provider = MockAIProvider::new().with_response("ok.");
            let history: Vec<Turn> = (0..25)
                .map(|i| {
                    if i % 2 == 0 {
                        Turn::user("tell me more")
                    } else {
                        Turn::assistant("perhaps.")
                    }
                })
                .collect();
            handler_with(&provider)
                .handle(PlayTurnCommand::new("go on", history))
                .await;

            let prompt = provider.get_calls()[0].system_prompt.clone().unwrap();
            assert!(prompt.contains(crate::domain::game::stage_directive(20).unwrap()));
            assert!(!prompt.contains(crate::domain::game::stage_directive(30).unwrap()));
        }

        #[tokio::test]
        async fn separated_reply_becomes_a_burst() {
            let provider = MockAIProvider::new().with_response("hmm---interesting---go on");
            let reply = handler_with(&provider)
                .handle(PlayTurnCommand::new("hello", vec![]))
                .await;

            assert_eq!(reply.reply, "hmm");
            assert_eq!(
                reply.additional,
                Some(vec!["interesting".to_string(), "go on".to_string()])
            );
            assert_eq!(reply.win, Some(false));
            assert_eq!(reply.messages().count(), 3);
        }

        #[tokio::test]
        async fn truncated_reply_is_still_delivered() {
            let provider = MockAIProvider::new().with_truncated_response("i was about to say");
            let reply = handler_with(&provider)
                .handle(PlayTurnCommand::new("hello", vec![]))
                .await;

            assert_eq!(reply.reply, "i was about to say");
            assert!(reply.error.is_none());
        }

        #[tokio::test]
        async fn win_phrase_in_model_reply_flags_win() {
            let provider = MockAIProvider::new().with_response("maybe you're human too.");
            let reply = handler_with(&provider)
                .handle(PlayTurnCommand::new("hello", vec![]))
                .await;

            assert_eq!(reply.reply, "maybe you're human too.");
            assert_eq!(reply.win, Some(true));
        }
    }

    mod concurrency {
        use super::*;
        use std::time::Duration;

        fn turn_for(name: &str) -> PlayTurnCommand {
            PlayTurnCommand::new(
                format!("{} again, who are you?", name),
                vec![
                    Turn::user(format!("my name is {}", name)),
                    Turn::assistant(format!("hello {}.", name)),
                ],
            )
        }

        #[tokio::test]
        async fn simultaneous_turns_keep_their_own_context() {
            let provider = MockAIProvider::new().with_delay(Duration::from_millis(20));
            let handler = handler_with(&provider);

            let (sam, robin) = tokio::join!(
                handler.handle(turn_for("sam")),
                handler.handle(turn_for("robin"))
            );
            assert!(sam.error.is_none());
            assert!(robin.error.is_none());

            let calls = provider.get_calls();
            assert_eq!(calls.len(), 2);
            for name in ["sam", "robin"] {
                let other = if name == "sam" { "robin" } else { "sam" };
                let request = calls
                    .iter()
                    .find(|r| r.messages[0].content == format!("my name is {}", name))
                    .unwrap();

                assert_eq!(request.messages.len(), 3);
                assert!(request.messages.iter().all(|m| !m.content.contains(other)));

                let prompt = request.system_prompt.as_deref().unwrap();
                assert!(prompt.contains(&format!("- User's name: {}", name)));
                assert!(!prompt.contains(&format!("- User's name: {}", other)));
            }
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn provider_error_uses_fallback() {
            let provider = MockAIProvider::new().with_error(MockError::Unavailable {
                message: "down".to_string(),
            });
            let reply = handler_with(&provider)
                .handle(PlayTurnCommand::new("hello", vec![]))
                .await;

            assert!(FALLBACK_REPLIES.contains(&reply.reply.as_str()));
            assert_eq!(
                reply.error.as_deref(),
                Some("API error: provider unavailable: down")
            );
            assert!(reply.win.is_none());
        }

        #[tokio::test]
        async fn empty_completion_uses_fallback_without_error() {
            let provider = MockAIProvider::new().with_response("   ");
            let reply = handler_with(&provider)
                .handle(PlayTurnCommand::new("hello", vec![]))
                .await;

            assert!(FALLBACK_REPLIES.contains(&reply.reply.as_str()));
            assert!(reply.error.is_none());
        }

        #[test]
        fn malformed_request_reply() {
            let reply = TurnReply::from_error(&TurnError::MalformedRequest("eof".into()));
            assert_eq!(reply.reply, MALFORMED_REQUEST_REPLY);
            assert_eq!(reply.error.as_deref(), Some("JSON parse error"));
        }
    }
}
