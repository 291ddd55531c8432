//! Checkmate - conversation-steering engine for the mAIsy chat game.
//!
//! A language model is steered, through a system prompt rebuilt every turn,
//! toward getting the user to say it feels human. This crate classifies the
//! conversation, composes the staged prompt, detects the win condition and
//! splits each completion into a burst of short messages.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
