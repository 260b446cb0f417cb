//! # Deckflow Workflow
//!
//! The review workflow: a small state machine that sequences strategy
//! analysis, slide drafting and critique, pausing for human review.
//!
//! ```text
//! ANALYZE -> AWAIT_STRATEGY_REVIEW -> (ANALYZE | DRAFT)
//! DRAFT -> AWAIT_SLIDE_REVIEW -> CRITIQUE -> (DRAFT | DONE)
//! ```

pub mod audit;
pub mod engine;
pub mod error;
pub mod executor;
pub mod extract;
pub mod prompts;
pub mod source;

pub use audit::{AuditVerdict, classify_audit};
pub use engine::{SessionInput, SessionSnapshot, StepOutcome, WorkflowEngine};
pub use error::WorkflowError;
pub use executor::{AnalyzeExecutor, CritiqueExecutor, DraftExecutor, StepExecutor};
pub use extract::{extract_plan_payload, parse_slide_plan};
pub use source::{SourceBundle, read_source_file};
