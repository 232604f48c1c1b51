//! Configuration management for Visionary.
//!
//! Configuration is loaded from a platform-appropriate TOML file with
//! sensible defaults; a missing file is not an error.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Visionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// OCR engine settings
    pub ocr: OcrConfig,

    /// Chat model settings
    pub llm: LlmConfig,

    /// Speech synthesis settings
    pub speech: SpeechConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.visionary.visionary/config.toml
    /// - Linux: ~/.config/visionary/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\visionary\config\config.toml
    ///
    /// Falls back to ~/.visionary/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "visionary", "visionary")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".visionary").join("config.toml")
            })
    }

    /// Get the resolved API key file path (with ~ expansion).
    pub fn key_file(&self) -> PathBuf {
        let path_str = self.general.key_file.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.limits.max_file_size_mb, 20);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[llm]"));
        assert!(toml.contains("[speech]"));
    }

    #[test]
    fn test_key_file_tilde_expansion() {
        let config = Config::default();
        let key_file = config.key_file();
        assert!(!key_file.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gemini-1.5-pro\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "gemini-1.5-pro");
        // Unspecified sections fall back to defaults
        assert_eq!(config.speech.voice, "Kore");
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
