//! Color palette for the terminal widget.
//!
//! Catppuccin Mocha, with the web widget's blue/slate bubble split.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Bubbles
    pub user: Color,
    pub bot: Color,

    // Semantic
    pub error: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46), // #1e1e2e

            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            user: Color::Rgb(137, 180, 250), // #89b4fa (blue)
            bot: Color::Rgb(148, 226, 213),  // #94e2d5 (teal)

            error: Color::Rgb(243, 139, 168), // #f38ba8 (red)

            border: Color::Rgb(69, 71, 90),             // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// High-contrast theme using the terminal's basic colors.
    pub fn high_contrast() -> Self {
        Self {
            base: Color::Reset,
            text: Color::White,
            subtext: Color::Gray,
            muted: Color::DarkGray,
            user: Color::LightBlue,
            bot: Color::LightCyan,
            error: Color::LightRed,
            border: Color::Gray,
            border_focused: Color::White,
        }
    }
}
