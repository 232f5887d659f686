// WideChat session settings engine
// Reads the host settings from a JSON file at the platform-specific config path.
// The host never writes the file; operators edit it by hand.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::SessionSettings;

/// Overrides the settings file location.
pub const CONFIG_PATH_ENV: &str = "WIDECHAT_SESSION_CONFIG";

const DATABASE_FILE_NAME: &str = "widechat-session.db";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<SessionSettings, SettingsError>;
    fn get_settings(&self) -> &SessionSettings;
    fn get_config_path(&self) -> &str;
}

/// Settings engine backed by a JSON file on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: SessionSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine holding defaults until [`load`](SettingsEngineTrait::load).
    ///
    /// Path precedence: `path_override`, then `$WIDECHAT_SESSION_CONFIG`, then
    /// `settings.json` inside the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| {
                platform::get_config_dir()
                    .join("settings.json")
                    .to_string_lossy()
                    .to_string()
            });

        Self {
            config_path,
            settings: SessionSettings::default(),
        }
    }

    /// Resolves the SQLite file path from the loaded settings.
    pub fn database_path(&self) -> PathBuf {
        match &self.settings.storage.database_path {
            Some(path) => PathBuf::from(path),
            None => platform::get_data_dir().join(DATABASE_FILE_NAME),
        }
    }

    fn validate(settings: &SessionSettings) -> Result<(), SettingsError> {
        let zero = [
            ("api.request_timeout_secs", settings.api.request_timeout_secs == 0),
            ("host.rate_limit_per_second", settings.host.rate_limit_per_second == 0),
            ("host.queue_capacity", settings.host.queue_capacity == 0),
        ];
        match zero.iter().find(|(_, is_zero)| *is_zero) {
            Some((key, _)) => Err(SettingsError::InvalidValue(format!("{} must be greater than zero", key))),
            None => Ok(()),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// Missing file yields defaults. On any error the previously held settings
    /// are kept, so callers can log and carry on with defaults.
    fn load(&mut self) -> Result<SessionSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            tracing::debug!(path = %self.config_path, "No settings file, using defaults");
            self.settings = SessionSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: SessionSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Self::validate(&settings)?;

        tracing::debug!(path = %self.config_path, "Loaded settings");
        self.settings = settings;
        Ok(self.settings.clone())
    }

    fn get_settings(&self) -> &SessionSettings {
        &self.settings
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
