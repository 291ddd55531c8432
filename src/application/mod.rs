//! Application layer - command handlers orchestrating domain logic.
//!
//! - `handlers::chat` - one game turn and the reset path

pub mod handlers;
