//! Text generation capability.
//!
//! The workflow treats text generation as an opaque, possibly slow,
//! possibly failing call. Implementations live in extension crates.

mod mock;
mod traits;

pub use mock::{GenerationCall, MockGenerator};
pub use traits::*;
