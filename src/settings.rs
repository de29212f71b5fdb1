//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/multitris/settings.toml (or platform equivalent)

use crate::mode::{BoardGeometry, GameMode};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Smallest boards every mode can play on
const MIN_WIDTH: i32 = 10;
const MIN_HEIGHT: i32 = 6;
const MIN_RINGS: i32 = 4;
const MIN_SLOTS: i32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("board {field} must be at least {min}, got {value}")]
    InvalidGeometry {
        field: &'static str,
        min: i32,
        value: i32,
    },
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// Board dimensions
    pub board: BoardGeometry,
}

/// Gameplay settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Mode started when no other is requested
    pub default_mode: GameMode,
    /// Fixed seed for reproducible piece sequences
    pub seed: Option<u64>,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "multitris", "multitris")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the config directory, falling back to defaults
    ///
    /// A missing file is normal; an unreadable or invalid one is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load and validate settings from `path`
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Check the board is large enough for every mode
    pub fn validate(&self) -> Result<(), SettingsError> {
        let board = &self.board;
        for (field, min, value) in [
            ("width", MIN_WIDTH, board.width),
            ("height", MIN_HEIGHT, board.height),
            ("rings", MIN_RINGS, board.rings),
            ("slots", MIN_SLOTS, board.slots),
        ] {
            if value < min {
                return Err(SettingsError::InvalidGeometry { field, min, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("multitris-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.gameplay.default_mode, GameMode::Classic);
        assert_eq!(settings.gameplay.seed, None);
        assert_eq!(settings.board, BoardGeometry::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [gameplay]
            default_mode = "gravity-flip"

            [board]
            rings = 8
            "#,
        )
        .unwrap();
        assert_eq!(settings.gameplay.default_mode, GameMode::GravityFlip);
        assert_eq!(settings.board.rings, 8);
        assert_eq!(settings.board.width, 10);
        assert_eq!(settings.board.slots, 16);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("roundtrip/settings.toml");
        let mut settings = Settings::default();
        settings.gameplay.default_mode = GameMode::Mirror;
        settings.gameplay.seed = Some(42);
        settings.board.height = 24;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_rejects_small_board() {
        let mut settings = Settings::default();
        settings.board.width = 6;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidGeometry { field: "width", .. })
        ));

        let path = scratch("small/settings.toml");
        settings.save_to(&path).unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::InvalidGeometry { .. })
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            Settings::load_from(&scratch("missing/settings.toml")),
            Err(SettingsError::Io { .. })
        ));

        let path = scratch("garbage/settings.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[gameplay]\ndefault_mode = \"tetris99\"\n").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
        let _ = fs::remove_file(&path);
    }
}
