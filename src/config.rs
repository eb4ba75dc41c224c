use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// User preferences loaded once at startup. Missing or unreadable files
/// fall back to defaults; the file is only ever edited by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Play a chime at session boundaries.
    pub sound_enabled: bool,
    /// Show a desktop notification at session boundaries.
    pub notifications_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("config file is invalid, using defaults: {e}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tomodoro")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json"));
        assert!(config.sound_enabled);
        assert!(config.notifications_enabled);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"sound_enabled": false}"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert!(!config.sound_enabled);
        assert!(config.notifications_enabled);
    }

    #[test]
    fn invalid_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{broken").unwrap();

        let config = AppConfig::load_from(&path);
        assert!(config.sound_enabled);
    }
}
