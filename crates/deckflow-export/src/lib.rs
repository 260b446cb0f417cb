//! # Deckflow Export
//!
//! Renders a finalized slide plan into a document. Rendering never fails on
//! sparse plans: zero slides, missing bullets and missing design hints all
//! produce a valid document.

mod error;
mod markdown;
mod renderer;
mod theme;

pub use error::ExportError;
pub use markdown::MarkdownRenderer;
pub use renderer::{DeckRenderer, export_to_file};
pub use theme::{Rgb, Theme, hex_to_rgb};
