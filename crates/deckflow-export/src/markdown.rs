//! Markdown deck renderer.

use std::fmt::Write as _;
use std::path::Path;

use async_trait::async_trait;
use deckflow_protocols::{Slide, SlidePlan};
use tracing::warn;

use crate::error::ExportError;
use crate::renderer::DeckRenderer;
use crate::theme::Theme;

const UNTITLED: &str = "Untitled";
const SLIDE_SEPARATOR: &str = "\n---\n\n";

/// Renders a plan as a Markdown slide outline, one `---`-separated section
/// per slide.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    async fn load_template(template: Option<&Path>) -> Option<String> {
        let path = template?;
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Template unreadable, using built-in theme");
                None
            }
        }
    }

    fn render_theme(out: &mut String, theme: &Theme) {
        let _ = write!(
            out,
            "<!-- theme: font-family={}; title-color={}; body-color={}",
            comment_safe(&theme.font_family),
            theme.title_color.to_hex(),
            theme.body_color.to_hex()
        );
        if let Some(background) = theme.background {
            let _ = write!(out, "; background={}", background.to_hex());
        }
        out.push_str(" -->\n\n");
    }

    fn render_slide(out: &mut String, slide: &Slide) {
        let title = single_line(&slide.title);
        let title = if title.is_empty() { UNTITLED } else { &title };
        let _ = writeln!(out, "## {title}\n");

        for bullet in &slide.bullets {
            let _ = writeln!(out, "- {}", single_line(bullet));
        }
        if !slide.bullets.is_empty() {
            out.push('\n');
        }

        let notes = slide.speaker_notes.trim();
        if !notes.is_empty() {
            let _ = writeln!(out, "<!-- notes: {} -->\n", comment_safe(notes));
        }
    }
}

/// Headings and list items end at a newline.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Break up sequences that would close an HTML comment early.
fn comment_safe(text: &str) -> String {
    text.replace("--!>", "--! >").replace("-->", "-- >")
}

#[async_trait]
impl DeckRenderer for MarkdownRenderer {
    fn extension(&self) -> &str {
        "md"
    }

    async fn render(
        &self,
        plan: &SlidePlan,
        template: Option<&Path>,
    ) -> Result<Vec<u8>, ExportError> {
        let preamble = Self::load_template(template).await;
        let theme = Theme::resolve(plan.design.as_ref(), preamble.is_some());

        let mut out = String::new();
        if let Some(preamble) = preamble {
            out.push_str(preamble.trim_end());
            out.push_str("\n\n");
        }
        Self::render_theme(&mut out, &theme);

        if plan.slides.is_empty() {
            out.push_str("_No slides._\n");
        }
        for (i, slide) in plan.slides.iter().enumerate() {
            if i > 0 {
                out.push_str(SLIDE_SEPARATOR);
            }
            Self::render_slide(&mut out, slide);
        }

        Ok(out.into_bytes())
    }
}
