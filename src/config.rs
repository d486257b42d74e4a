//! Configuration file support for the configurator.
//!
//! User preferences and key bindings are kept in a small JSON file so the
//! operator does not have to repeat command-line flags for every session.
//! This is unrelated to the marker file the session writes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_PREVIEW_HEIGHT, DEFAULT_MAX_PREVIEW_WIDTH, DEFAULT_OUTPUT_FILENAME,
};
use crate::keybindings::KeyBindings;
use crate::message::KeyPress;
use crate::model::Dimensions;
use crate::state::SessionOptions;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "unknown log level {other:?} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Persisted configurator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindingsConfig,
}

fn default_app_name() -> String {
    "RoundPen Configurator".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Where the marker file is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Largest preview width in pixels
    #[serde(default = "default_max_preview_width")]
    pub max_preview_width: u32,

    /// Largest preview height in pixels
    #[serde(default = "default_max_preview_height")]
    pub max_preview_height: u32,

    /// Start with the region-of-interest step
    #[serde(default = "default_true")]
    pub enable_region_selection: bool,

    /// Ask for a background color before the markers
    #[serde(default = "default_true")]
    pub enable_background_step: bool,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILENAME)
}

fn default_max_preview_width() -> u32 {
    DEFAULT_MAX_PREVIEW_WIDTH
}

fn default_max_preview_height() -> u32 {
    DEFAULT_MAX_PREVIEW_HEIGHT
}

fn default_true() -> bool {
    true
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            max_preview_width: default_max_preview_width(),
            max_preview_height: default_max_preview_height(),
            enable_region_selection: true,
            enable_background_step: true,
            log_level: LogLevel::default(),
        }
    }
}

impl UserPreferences {
    /// Session options for these preferences.
    ///
    /// A zero preview size falls back to the default.
    pub fn session_options(&self) -> SessionOptions {
        let width = match self.max_preview_width {
            0 => DEFAULT_MAX_PREVIEW_WIDTH,
            w => w,
        };
        let height = match self.max_preview_height {
            0 => DEFAULT_MAX_PREVIEW_HEIGHT,
            h => h,
        };

        SessionOptions::default()
            .output_path(&self.output_path)
            .region_selection(self.enable_region_selection)
            .background_step(self.enable_background_step)
            .max_preview(Dimensions::new(width, height))
    }
}

/// Keybinding configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindingsConfig {
    /// Keys that confirm the region or background step
    pub confirm: Vec<KeyPress>,
    /// Key that commits the open marker
    pub commit: KeyPress,
    /// Key that ends the session
    pub cancel: KeyPress,
    /// Key that deletes the last typed character
    pub backspace: KeyPress,
    /// Key that writes the configuration
    pub save: KeyPress,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self::from(&KeyBindings::default())
    }
}

impl From<&KeyBindings> for KeyBindingsConfig {
    fn from(bindings: &KeyBindings) -> Self {
        Self {
            confirm: bindings.confirm.clone(),
            commit: bindings.commit,
            cancel: bindings.cancel,
            backspace: bindings.backspace,
            save: bindings.save,
        }
    }
}

impl KeyBindingsConfig {
    /// Convert back to KeyBindings.
    ///
    /// Bindings that conflict fall back to the defaults.
    pub fn to_keybindings(&self) -> KeyBindings {
        let bindings = KeyBindings {
            confirm: self.confirm.clone(),
            commit: self.commit,
            cancel: self.cancel,
            backspace: self.backspace,
            save: self.save,
        };

        let conflicts = bindings.conflicts();
        if bindings.confirm.is_empty() || !conflicts.is_empty() {
            for conflict in &conflicts {
                log::warn!("Keybinding conflict: {}", conflict);
            }
            if bindings.confirm.is_empty() {
                log::warn!("No confirm key bound");
            }
            log::warn!("Using default keybindings");
            return KeyBindings::default();
        }
        bindings
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            keybindings: KeyBindingsConfig::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default config filename.
    pub fn default_filename() -> &'static str {
        "roundpen-config.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("roundpen").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("roundpen")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from `path`.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults.
    ///
    /// A missing file means defaults. When the file exists but cannot be read
    /// or parsed, the defaults come back together with the error so the caller
    /// can report it.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        if !path.exists() {
            return (Self::default(), None);
        }

        match Self::load_from_path(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
