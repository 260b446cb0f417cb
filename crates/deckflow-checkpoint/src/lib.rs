//! # Deckflow Checkpoint
//!
//! Snapshot storage for review workflow sessions.
//!
//! ## Features
//!
//! - One snapshot per completed workflow step
//! - Current pending state lookup without re-running steps
//! - In-memory and file-backed stores with retention pruning

pub mod checkpoint;
pub mod error;
pub mod store;

pub use checkpoint::{Checkpoint, SnapshotManager, StepName};
pub use error::CheckpointError;
pub use store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
