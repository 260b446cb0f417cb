//! Error types for Deckflow protocols.

mod generation;

pub use generation::GenerationError;
