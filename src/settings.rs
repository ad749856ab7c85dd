//! Application settings persistence
//!
//! Settings are stored in a JSON file at the platform-appropriate config location:
//! - macOS: ~/Library/Application Support/table-menu/settings.json
//! - Windows: %APPDATA%/table-menu/settings.json
//! - Linux: ~/.config/table-menu/settings.json

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Smallest table the settings allow
pub const MIN_TABLE_SIZE: usize = 1;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Window width in logical pixels
    pub window_width: f32,

    /// Window height in logical pixels
    pub window_height: f32,

    /// Whether new tables treat the first row as headings
    pub with_headings: bool,

    /// Rows in a freshly created table
    pub default_rows: usize,

    /// Columns in a freshly created table
    pub default_cols: usize,

    /// Data sources a row can be iterated over (source name -> field names)
    pub iteratables: BTreeMap<String, Vec<String>>,

    /// Whether delete items need a second click
    pub confirm_destructive: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let iteratables = BTreeMap::from([
            (
                "billings".to_string(),
                vec!["service".into(), "name".into(), "code".into(), "price".into()],
            ),
            (
                "patients".to_string(),
                vec!["name".into(), "age".into(), "sex".into(), "number".into()],
            ),
        ]);

        Self {
            window_width: 1000.0,
            window_height: 700.0,
            with_headings: false,
            default_rows: 3,
            default_cols: 3,
            iteratables,
            confirm_destructive: true,
        }
    }
}

impl AppSettings {
    /// Get the path to the settings file
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("table-menu");
            path.push("settings.json");
            path
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            log::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read settings file: {}", e);
                }
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else {
            log::warn!("Could not determine config directory, settings not saved");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(&path, contents) {
                    log::warn!("Failed to write settings file: {}", e);
                } else {
                    log::info!("Saved settings to {}", path.display());
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
            }
        }
    }

    /// Parse settings and clamp values the table cannot work with
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(contents)?;
        settings.default_rows = settings.default_rows.max(MIN_TABLE_SIZE);
        settings.default_cols = settings.default_cols.max(MIN_TABLE_SIZE);
        Ok(settings)
    }

    /// Configured data source names, in display order
    pub fn iteratable_names(&self) -> impl Iterator<Item = &str> {
        self.iteratables.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.window_width, 1000.0);
        assert_eq!(settings.default_rows, 3);
        assert!(!settings.with_headings);
        assert!(settings.confirm_destructive);
        let names: Vec<_> = settings.iteratable_names().collect();
        assert_eq!(names, ["billings", "patients"]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = AppSettings::from_json(r#"{ "with_headings": true }"#).unwrap();
        assert!(settings.with_headings);
        assert_eq!(settings.default_cols, 3);
        assert_eq!(settings.iteratables.len(), 2);
    }

    #[test]
    fn test_zero_table_size_is_clamped() {
        let settings =
            AppSettings::from_json(r#"{ "default_rows": 0, "default_cols": 0 }"#).unwrap();
        assert_eq!(settings.default_rows, MIN_TABLE_SIZE);
        assert_eq!(settings.default_cols, MIN_TABLE_SIZE);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AppSettings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_serialize_deserialize() {
        let mut settings = AppSettings::default();
        settings.window_width = 800.0;
        settings.iteratables.insert("doctors".into(), vec!["count".into()]);

        let json = serde_json::to_string(&settings).unwrap();
        let loaded = AppSettings::from_json(&json).unwrap();

        assert_eq!(loaded, settings);
    }
}
