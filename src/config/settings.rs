use crate::runtime::AttachPoint;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {path} is invalid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory or `http(s)://` URL the hat models are loaded from
    pub base: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            base: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// Also write logs to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub ansi: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            ansi: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// The JSON hat database
    pub catalog_path: PathBuf,
    pub attach_point: AttachPoint,
    pub assets: AssetSettings,
    pub logging: LoggingSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("public/hats.json"),
            attach_point: AttachPoint::Head,
            assets: AssetSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Default settings location in the platform config directory
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "wear-a-hat", "wear-a-hat")
        .map(|proj| proj.config_dir().join(CONFIG_FILE))
}

/// Read settings from `path`
pub fn load_settings_from(path: &Path) -> SettingsResult<AppSettings> {
    let data = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read settings from `explicit`, or from the default location.
///
/// A missing file at the default location yields the defaults; a missing
/// explicit file is an error.
pub fn load_settings(explicit: Option<&Path>) -> SettingsResult<AppSettings> {
    if let Some(path) = explicit {
        return load_settings_from(path);
    }

    match settings_path() {
        Some(path) if path.exists() => {
            let settings = load_settings_from(&path)?;
            info!("⚙️ Loaded settings from {}", path.display());
            Ok(settings)
        }
        _ => Ok(AppSettings::default()),
    }
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> SettingsResult<()> {
    let io_error = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let toml = toml::to_string_pretty(settings)?;
    fs::write(path, toml).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: AppSettings = toml::from_str(
            r#"
            attach_point = "left-hand"

            [assets]
            base = "https://hats.example.com/public"
            "#,
        )
        .unwrap();

        assert_eq!(settings.attach_point, AttachPoint::LeftHand);
        assert_eq!(settings.assets.base, "https://hats.example.com/public");
        assert_eq!(settings.catalog_path, PathBuf::from("public/hats.json"));
        assert_eq!(settings.logging, LoggingSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut settings = AppSettings::default();
        settings.logging.level = "debug".to_string();
        settings.logging.file = Some(PathBuf::from("hats.log"));
        save_settings_to(&path, &settings).unwrap();

        assert_eq!(load_settings(Some(&path)).unwrap(), settings);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(load_settings(Some(&missing)), Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_bad_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "attach_point = \"tail\"").unwrap();
        assert!(matches!(load_settings_from(&path), Err(SettingsError::Parse { .. })));
    }
}
