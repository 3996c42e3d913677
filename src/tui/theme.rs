use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::util::color::{contrast_text_color, parse_hex_rgb};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub selection_border: Color,
    /// Cards without a tab color are painted with this
    pub blank_card: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            blank_card: Color::Rgb(0xFF, 0xFF, 0xFF),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    parse_hex_rgb(hex).map(|(r, g, b)| Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from `[ui.colors]`, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "selection_border" => theme.selection_border = color,
                    "blank_card" => theme.blank_card = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Background and text colors for a sheet card
    pub fn card_colors(&self, tab_color: Option<&str>) -> (Color, Color) {
        let bg = tab_color.and_then(parse_hex_color).unwrap_or(self.blank_card);
        let fg = parse_hex_color(contrast_text_color(tab_color)).unwrap_or(self.text_bright);
        (bg, fg)
    }
}
