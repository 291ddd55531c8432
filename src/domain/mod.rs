//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `game` - Conversation-steering engine (classification, prompt, win, segmentation)

pub mod game;
