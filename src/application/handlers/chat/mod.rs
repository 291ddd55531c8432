//! Chat command handlers.
//!
//! Handles a single game turn and the reset request.

mod play_turn;
mod reset_game;

pub use play_turn::{PlayTurnCommand, PlayTurnHandler, PlayTurnSettings, TurnError, TurnReply};
pub use reset_game::ResetGameHandler;
