//! Step executors.
//!
//! Each executor reads the session record, performs one unit of work through
//! the injected generator, and returns a partial update. None of them touch
//! the snapshot store.

mod analyze;
mod critique;
mod draft;
mod traits;

pub use analyze::AnalyzeExecutor;
pub use critique::{CritiqueExecutor, GENERATION_RETRY_FEEDBACK, rejection_feedback};
pub use draft::DraftExecutor;
pub use traits::StepExecutor;

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
