//! OpenAI-compatible text generation for Deckflow.

mod api;
mod provider;

pub use provider::OpenAIProvider;
