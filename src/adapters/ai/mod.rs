//! AI adapters - Implementations of the AIProvider port.
//!
//! - `OpenAIProvider` - OpenAI-compatible chat completions (xAI by default)
//! - `MockAIProvider` - Configurable mock for testing

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
