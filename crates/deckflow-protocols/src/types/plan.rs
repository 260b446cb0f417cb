//! Structured slide plan types.
//!
//! This is the interchange shape produced by drafting and consumed by the
//! export collaborator.

use serde::{Deserialize, Serialize};

/// Title used by the sentinel failure plan.
pub const FAILED_PLAN_TITLE: &str = "Error";

/// Single bullet of the sentinel failure plan.
pub const FAILED_PLAN_BULLET: &str = "generation failed";

/// Optional visual hints for the deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Hex string such as `#1F2937`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,

    /// Hex string such as `#2563EB`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

/// One slide of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,

    #[serde(default)]
    pub bullets: Vec<String>,

    #[serde(default)]
    pub speaker_notes: String,
}

impl Slide {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bullets: Vec::new(),
            speaker_notes: String::new(),
        }
    }

    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullets.push(bullet.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.speaker_notes = notes.into();
        self
    }
}

/// A structured slide deck plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<DesignHints>,

    pub slides: Vec<Slide>,
}

impl SlidePlan {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            design: None,
            slides,
        }
    }

    pub fn with_design(mut self, design: DesignHints) -> Self {
        self.design = Some(design);
        self
    }

    /// The sentinel plan written when drafting produced unusable output.
    pub fn generation_failed() -> Self {
        Self::new(vec![
            Slide::new(FAILED_PLAN_TITLE).with_bullet(FAILED_PLAN_BULLET),
        ])
    }

    /// Whether this is the sentinel failure plan (design hints are ignored).
    pub fn is_generation_failed(&self) -> bool {
        matches!(
            self.slides.as_slice(),
            [only] if only.title == FAILED_PLAN_TITLE
                && only.bullets.len() == 1
                && only.bullets[0] == FAILED_PLAN_BULLET
                && only.speaker_notes.is_empty()
        )
    }

    /// At least one slide, and every slide has a non-blank title.
    pub fn has_required_structure(&self) -> bool {
        !self.slides.is_empty() && self.slides.iter().all(|s| !s.title.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
