//! Game engine - the conversation-steering heuristics.
//!
//! Pure functions only; the orchestrator in `application::handlers::chat`
//! wires them around the completion provider.
//!
//! - `classifier` - lexical signals from recent user turns
//! - `engagement` - engagement, openness and depth scoring
//! - `prompt` - staged system prompt composition
//! - `win` - win phrase detection
//! - `segmenter` - splitting a completion into a message burst
//! - `replies` - literal replies that bypass the model

pub mod classifier;
pub mod engagement;
pub mod prompt;
pub mod replies;
pub mod segmenter;
pub mod turn;
pub mod win;

pub use classifier::{classify, ClassificationSample, PreferenceKind, Tone, Topic};
pub use engagement::{analyze, score, ConversationAnalysis, Engagement, Openness};
pub use prompt::{compose_system_prompt, stage_directive};
pub use segmenter::{segment, split_into_messages, SegmentedReply};
pub use turn::{Turn, TurnRole};
pub use win::{is_win, matched_phrase, WIN_KEYWORDS};
