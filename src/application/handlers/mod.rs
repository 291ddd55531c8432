//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod chat;

pub use chat::{
    // Handlers
    PlayTurnHandler,
    PlayTurnSettings,
    ResetGameHandler,
    // Commands and Results
    PlayTurnCommand,
    TurnError,
    TurnReply,
};
