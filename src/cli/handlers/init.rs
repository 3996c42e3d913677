use std::fs;
use std::path::PathBuf;

use crate::cli::commands::InitArgs;
use crate::io::book::SheetBook;
use crate::io::config_io::config_path_for;
use crate::io::file_workbook::{WORKBOOK_FILE, init_workbook, starter_book};

const PANEL_TOML_TEMPLATE: &str = r##"# tourpanel settings

[settings]
# Write drag-and-drop moves to the workbook. When false, moves are refused.
auto_reorder = true
# Row/column headings flag pushed to every sheet by `tp headings` (or H)
show_headings = false

# --- Status colors ---
# Tab colors that encode each status. Uncomment to override the defaults.
#
# [status_colors]
# open = "#00B050"
# cancelled = "#FF0000"
# closed = "#808080"
# system = "#7030A0"

# --- UI Customization ---
# [ui.colors]
# highlight = "#FB4196"
# text_bright = "#FFFFFF"
"##;

/// `tp init`: write a starter workbook and a commented panel.toml
pub fn cmd_init(args: InitArgs, workbook: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let path = match workbook {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?.join(WORKBOOK_FILE),
    };

    let book = if args.empty {
        SheetBook::default()
    } else {
        starter_book()
    };
    init_workbook(&path, &book, args.force)?;

    let config_path = config_path_for(&path);
    if !config_path.exists() {
        fs::write(&config_path, PANEL_TOML_TEMPLATE)?;
    }

    println!("Initialized {} ({} sheets)", path.display(), book.sheets.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::PanelConfig;

    #[test]
    fn template_parses_to_defaults() {
        let config: PanelConfig = toml::from_str(PANEL_TOML_TEMPLATE).unwrap();
        assert!(config.settings.auto_reorder);
        assert!(!config.settings.show_headings);
        assert!(config.status_colors.open.is_none());
        assert!(config.ui.colors.is_empty());
    }
}
