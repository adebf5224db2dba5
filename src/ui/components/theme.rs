//! Theme definitions: a muted dark palette and a clean light one.
//!
//! Accent colors are used sparingly: the header, the focused form field, and
//! the selected row. Status and error lines get their own semantic colors.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Base colors shared by the palettes.
pub mod colors {
    use ratatui::style::Color;

    // ═══════════════════════════════════════════════════════════════════════════
    // BASE COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Deep background - primary canvas color
    pub const BG_DEEP: Color = Color::Rgb(26, 27, 38); // #1a1b26

    /// Elevated surface - form panel
    pub const BG_SURFACE: Color = Color::Rgb(36, 40, 59); // #24283b

    /// Selected row background
    pub const BG_HIGHLIGHT: Color = Color::Rgb(41, 46, 66); // #292e42

    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261

    pub const BORDER_FOCUS: Color = Color::Rgb(125, 145, 200); // #7d91c8

    // ═══════════════════════════════════════════════════════════════════════════
    // TEXT COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub const TEXT_PRIMARY: Color = Color::Rgb(192, 202, 245); // #c0caf5

    /// Muted text - hints, placeholders, emails
    pub const TEXT_MUTED: Color = Color::Rgb(105, 114, 158); // #696e9e

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCENT & STATUS COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub const ACCENT_PRIMARY: Color = Color::Rgb(122, 162, 247); // #7aa2f7

    pub const ACCENT_SECONDARY: Color = Color::Rgb(187, 154, 247); // #bb9af7

    pub const STATUS_SUCCESS: Color = Color::Rgb(115, 218, 202); // #73daca

    pub const STATUS_ERROR: Color = Color::Rgb(247, 118, 142); // #f7768e
}

/// Palette selector as written in the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn palette(self) -> ThemePalette {
        match self {
            ThemeName::Dark => ThemePalette::dark(),
            ThemeName::Light => ThemePalette::light(),
        }
    }
}

impl std::str::FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeName::Dark),
            "light" => Ok(ThemeName::Light),
            other => Err(format!("unknown theme `{other}` (expected dark or light)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub accent: Color,
    pub accent_alt: Color,
    pub bg: Color,
    pub fg: Color,
    pub surface: Color,
    pub highlight: Color,
    pub hint: Color,
    pub border: Color,
    pub success: Color,
    pub error: Color,
}

impl ThemePalette {
    /// Light theme - clean, minimal, professional
    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(47, 107, 231),     // Rich blue
            accent_alt: Color::Rgb(124, 93, 198), // Purple
            bg: Color::Rgb(250, 250, 252),        // Off-white
            fg: Color::Rgb(36, 41, 46),           // Near-black
            surface: Color::Rgb(240, 241, 245),   // Light gray
            highlight: Color::Rgb(224, 231, 250), // Pale blue
            hint: Color::Rgb(125, 134, 144),      // Medium gray
            border: Color::Rgb(216, 222, 228),    // Border gray
            success: Color::Rgb(45, 138, 72),     // Forest green
            error: Color::Rgb(207, 34, 46),       // Red
        }
    }

    /// Dark theme - refined, easy on the eyes
    pub fn dark() -> Self {
        Self {
            accent: colors::ACCENT_PRIMARY,
            accent_alt: colors::ACCENT_SECONDARY,
            bg: colors::BG_DEEP,
            fg: colors::TEXT_PRIMARY,
            surface: colors::BG_SURFACE,
            highlight: colors::BG_HIGHLIGHT,
            hint: colors::TEXT_MUTED,
            border: colors::BORDER,
            success: colors::STATUS_SUCCESS,
            error: colors::STATUS_ERROR,
        }
    }

    /// Title style - bold accent
    pub fn title(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Hint text style - for secondary/muted information
    pub fn hint_style(self) -> Style {
        Style::default().fg(self.hint)
    }

    pub fn border_style(self) -> Style {
        Style::default().fg(self.border)
    }

    /// Focused border style - for the active form field
    pub fn border_focus_style(self) -> Style {
        Style::default().fg(self.accent_alt)
    }

    pub fn status_style(self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Selected list row
    pub fn selected_style(self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }
}
