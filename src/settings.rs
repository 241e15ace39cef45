//! User settings stored as settings.json in the app data directory

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::DEFAULT_BACKEND_URL;

/// Persisted theme preference. The one piece of client state that
/// survives a restart besides window geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Light,
    Dark,
}

impl ThemeChoice {
    pub fn is_dark(self) -> bool {
        matches!(self, ThemeChoice::Dark)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    pub theme: ThemeChoice,

    // Backend
    pub backend_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            theme: ThemeChoice::Light,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_defaults_to_light_theme() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn dark_theme_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut settings = Settings::default();
        settings.theme = ThemeChoice::Dark;
        settings.save(dir.path());

        let reloaded = Settings::load(dir.path());
        assert_eq!(reloaded.theme, ThemeChoice::Dark);
        assert!(reloaded.theme.is_dark());
    }

    #[test]
    fn theme_serializes_as_lowercase_value() {
        let json = serde_json::to_string(&ThemeChoice::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
        let parsed: ThemeChoice = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(parsed, ThemeChoice::Light);
    }

    #[test]
    fn corrupt_file_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.theme, ThemeChoice::Light);
    }
}
