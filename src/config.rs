//! clipmark configuration
//!
//! Stored as YAML. Default location: ~/.config/clipmark/config.yaml,
//! overridable with the `CLIPMARK_CONFIG` environment variable.
//!
//! ```yaml
//! hotkey: Alt+s
//! socket_path: /tmp/mpv-socket
//! preferences:
//!   copyToClipboard: true
//!   useCustomDir: false
//!   customDir: ~/Movies/Clips
//! ```
//!
//! The `preferences` section is not part of [`ClipmarkConfig`]; it is read
//! fresh on every export through [`crate::prefs::YamlPreferences`].

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "CLIPMARK_CONFIG";

/// Host settings read once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipmarkConfig {
    /// mpv key name bound to clip marking
    pub hotkey: String,
    /// mpv `--input-ipc-server` socket
    pub socket_path: PathBuf,
}

impl Default for ClipmarkConfig {
    fn default() -> Self {
        Self {
            hotkey: "Alt+s".to_string(),
            socket_path: PathBuf::from("/tmp/mpv-socket"),
        }
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/clipmark/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("clipmark")
        .join("config.yaml")
}

/// Config path from `CLIPMARK_CONFIG`, or the default
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => default_config_path(),
    }
}

/// Read the startup settings at `path`
///
/// A missing file gives the defaults. An unreadable or malformed file is
/// logged and also gives the defaults.
pub fn load_config(path: &Path) -> ClipmarkConfig {
    let parsed = match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ClipmarkConfig>(&contents).map_err(|e| e.to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No config at {:?}, using defaults", path);
            return ClipmarkConfig::default();
        }
        Err(e) => Err(e.to_string()),
    };

    match parsed {
        Ok(config) => {
            log::info!("Config {:?}: hotkey {}, mpv socket {:?}", path, config.hotkey, config.socket_path);
            config
        }
        Err(e) => {
            log::warn!("Ignoring config {:?}: {}", path, e);
            ClipmarkConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClipmarkConfig::default();
        assert_eq!(config.hotkey, "Alt+s");
        assert_eq!(config.socket_path, PathBuf::from("/tmp/mpv-socket"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "hotkey: Ctrl+x\npreferences:\n  copyToClipboard: false\n",
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.hotkey, "Ctrl+x");
        assert_eq!(config.socket_path, PathBuf::from("/tmp/mpv-socket"));
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(&dir.path().join("nope.yaml")), ClipmarkConfig::default());

        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "hotkey: [1, 2\n").unwrap();
        assert_eq!(load_config(&path), ClipmarkConfig::default());
    }

    #[test]
    fn test_unreadable_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        // a directory exists but cannot be read as a file
        assert_eq!(load_config(dir.path()), ClipmarkConfig::default());
    }

    #[test]
    fn test_default_path_shape() {
        let path = default_config_path();
        assert!(path.ends_with("clipmark/config.yaml"));
    }
}
