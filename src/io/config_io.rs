use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::PanelConfig;

/// File name of the panel configuration, next to the workbook
pub const CONFIG_FILE: &str = "panel.toml";

/// Error type for panel.toml reads and writes
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse panel.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse panel.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// panel.toml beside the given workbook file
pub fn config_path_for(workbook: &Path) -> PathBuf {
    workbook.with_file_name(CONFIG_FILE)
}

/// Read the panel config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing. A missing file yields
/// defaults and an empty document.
pub fn read_config(path: &Path) -> Result<(PanelConfig, toml_edit::DocumentMut), ConfigError> {
    if !path.exists() {
        return Ok((PanelConfig::default(), toml_edit::DocumentMut::new()));
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: PanelConfig = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    crate::io::recovery::atomic_write(path, doc.to_string().as_bytes()).map_err(|e| {
        ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// Set a boolean under `[settings]`, creating the table if needed
pub fn set_setting(doc: &mut toml_edit::DocumentMut, key: &str, value: bool) {
    if !doc.contains_key("settings") {
        doc["settings"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["settings"][key] = toml_edit::value(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r##"# Panel settings
[settings]
auto_reorder = true   # drag-and-drop writes to the workbook
show_headings = false

[status_colors]
open = "#92D050"
"##
    }

    #[test]
    fn round_trip_preserves_formatting() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, sample_config()).unwrap();

        let (_config, doc) = read_config(&path).unwrap();
        write_config(&path, &doc).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), sample_config());
    }

    #[test]
    fn missing_file_is_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, doc) = read_config(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(config.settings.auto_reorder);
        assert!(doc.to_string().is_empty());
    }

    #[test]
    fn set_setting_keeps_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_setting(&mut doc, "show_headings", true);
        let result = doc.to_string();
        assert!(result.contains("# Panel settings"));
        assert!(result.contains("show_headings = true"));
        let config: PanelConfig = toml::from_str(&result).unwrap();
        assert!(config.settings.show_headings);
        assert_eq!(config.status_colors.palette().open, "#92D050");
    }

    #[test]
    fn set_setting_creates_table() {
        let mut doc = toml_edit::DocumentMut::new();
        set_setting(&mut doc, "auto_reorder", false);
        let config: PanelConfig = toml::from_str(&doc.to_string()).unwrap();
        assert!(!config.settings.auto_reorder);
    }

    #[test]
    fn config_lives_next_to_workbook() {
        assert_eq!(
            config_path_for(Path::new("/srv/tours/workbook.toml")),
            PathBuf::from("/srv/tours/panel.toml")
        );
    }
}
