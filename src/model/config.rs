use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::status::StatusPalette;

/// Configuration from panel.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub status_colors: StatusColorConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Apply drag-and-drop reorders to the workbook
    #[serde(default = "default_true")]
    pub auto_reorder: bool,
    /// Row/column headings flag pushed to every sheet by the headings toggle
    #[serde(default)]
    pub show_headings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_reorder: true,
            show_headings: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Overrides for the managed tab colors. Missing entries keep the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusColorConfig {
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub cancelled: Option<String>,
    #[serde(default)]
    pub closed: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
}

impl StatusColorConfig {
    pub fn palette(&self) -> StatusPalette {
        let mut palette = StatusPalette::default();
        let overrides = [
            (&self.open, &mut palette.open),
            (&self.cancelled, &mut palette.cancelled),
            (&self.closed, &mut palette.closed),
            (&self.system, &mut palette.system),
        ];
        for (value, slot) in overrides {
            if let Some(color) = value.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                *slot = color.to_string();
            }
        }
        palette
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Hex overrides for theme slots, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
