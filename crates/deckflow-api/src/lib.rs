//! # Deckflow Interface
//!
//! HTTP surface over the review workflow engine.
//!
//! ```text
//! POST   /sessions               create a session and run to the first pause
//! GET    /sessions/{id}          current record and pending state
//! POST   /sessions/{id}/advance  resume with optional reviewer feedback
//! GET    /sessions/{id}/history  retained snapshots, oldest first
//! GET    /sessions/{id}/export   rendered deck once the session is done
//! DELETE /sessions/{id}          remove the session
//! GET    /health
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::InterfaceError;
pub use http::routes::create_router;
pub use server::{InterfaceConfig, InterfaceServer};
pub use state::{AppState, SessionGuard};
