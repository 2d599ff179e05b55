pub mod settings;

// Re-export commonly used types
pub use settings::{
    AppSettings, AssetSettings, LoggingSettings, SettingsError, SettingsResult,
    load_settings, load_settings_from, save_settings_to, settings_path,
};
