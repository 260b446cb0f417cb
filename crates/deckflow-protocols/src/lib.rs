//! # Deckflow Protocols
//!
//! Shared protocol definitions for the Deckflow review workflow.
//! Contains the session data model and the capability traits the engine
//! depends on - no workflow logic.
//!
//! ## Core Types
//!
//! - [`SessionRecord`] - The mutable state threaded through one workflow run
//! - [`WorkflowState`] - The states of the review state machine
//! - [`SlidePlan`] - The structured deck produced by drafting
//! - [`TextGenerator`] - Trait for the external text-generation capability

pub mod error;
pub mod generation;
pub mod types;

// Re-export core traits and types
pub use error::GenerationError;
pub use generation::{GenerationCall, MockGenerator, SharedGenerator, TextGenerator};
pub use types::*;
