//! Shared data types.

mod plan;
mod session;
mod state;

pub use plan::*;
pub use session::*;
pub use state::*;
