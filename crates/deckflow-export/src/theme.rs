//! Deck theme resolution.

use deckflow_protocols::DesignHints;

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Background of the built-in dark theme.
pub const DARK_BACKGROUND: Rgb = Rgb(20, 25, 40);
/// Title colour of the built-in dark theme.
pub const DARK_TITLE: Rgb = Rgb::WHITE;
/// Body colour of the built-in dark theme.
pub const DARK_TEXT: Rgb = Rgb(200, 200, 200);

pub const DEFAULT_FONT: &str = "Arial";
const DEFAULT_TEMPLATE_TITLE: &str = "#000000";

/// Parse `#RRGGBB`, falling back to white for anything else.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    let Some(digits) = hex.strip_prefix('#') else {
        return Rgb::WHITE;
    };
    if digits.len() != 6 || !digits.is_ascii() {
        return Rgb::WHITE;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Rgb(r, g, b),
        _ => Rgb::WHITE,
    }
}

/// Resolved visual settings for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub font_family: String,
    pub title_color: Rgb,
    pub body_color: Rgb,
    /// Painted background; `None` when a template supplies its own.
    pub background: Option<Rgb>,
}

impl Theme {
    /// Resolve the theme from design hints.
    ///
    /// With a template, the title colour follows the hints and the body is
    /// black. Without one the dark theme is forced.
    pub fn resolve(design: Option<&DesignHints>, using_template: bool) -> Self {
        let font_family = design
            .and_then(|d| d.font_family.as_deref())
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(DEFAULT_FONT)
            .to_string();

        if using_template {
            let title = design
                .and_then(|d| d.title_color.as_deref())
                .unwrap_or(DEFAULT_TEMPLATE_TITLE);
            Self {
                font_family,
                title_color: hex_to_rgb(title),
                body_color: Rgb::BLACK,
                background: None,
            }
        } else {
            Self {
                font_family,
                title_color: DARK_TITLE,
                body_color: DARK_TEXT,
                background: Some(DARK_BACKGROUND),
            }
        }
    }
}
