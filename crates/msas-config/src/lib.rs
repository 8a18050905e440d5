//! Settings for msas
//!
//! Supports a small JSON settings file with:
//! - Per-field defaults for anything missing
//! - Silent fallback to defaults when the file is absent or malformed,
//!   per field when only some values have the wrong type
//! - Validation with clear error messages for the interactive setup

mod schema;
mod validation;

pub use schema::*;
pub use validation::*;

use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parse settings from a JSON string without any fallback
pub fn parse_settings(content: &str) -> ConfigResult<Settings> {
    Ok(serde_json::from_str(content)?)
}

/// Read settings from a JSON file, field by field
pub fn read_settings(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    parse_settings_lenient(&content)
}

/// Parse settings, keeping every field that deserializes on its own.
///
/// Fields with the wrong type fall back to their defaults one by one; only
/// content that is not a JSON object at all is an error.
pub fn parse_settings_lenient(content: &str) -> ConfigResult<Settings> {
    let strict_error = match parse_settings(content) {
        Ok(settings) => return Ok(settings),
        Err(e) => e,
    };

    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(content) else {
        return Err(strict_error);
    };

    let mut accepted = Map::new();
    for (key, value) in fields {
        let mut candidate = accepted.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<Settings>(Value::Object(candidate)) {
            Ok(_) => {
                accepted.insert(key, value);
            }
            Err(e) => warn!(field = %key, error = %e, "Ignoring invalid setting"),
        }
    }

    Ok(serde_json::from_value(Value::Object(accepted))?)
}

/// Load settings, falling back to defaults.
///
/// A missing file is the first-run case. An unreadable or unparsable file is
/// logged and ignored; a field with the wrong type is replaced by its
/// default. A zero countdown is replaced by the default; bad window strings
/// are kept, since the window gate treats them as "always".
pub fn load_settings(path: impl AsRef<Path>) -> Settings {
    let path = path.as_ref();

    let mut settings = match read_settings(path) {
        Ok(settings) => {
            info!(config_path = %path.display(), "Settings loaded");
            settings
        }
        Err(ConfigError::ReadError(e)) if e.kind() == ErrorKind::NotFound => {
            debug!(config_path = %path.display(), "No settings file, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!(config_path = %path.display(), error = %e, "Ignoring settings file");
            Settings::default()
        }
    };

    for error in validate_settings(&settings) {
        match error {
            ValidationError::NonPositiveCountdown => {
                warn!(default = DEFAULT_COUNTDOWN_SECONDS, "{}", error);
                settings.countdown_seconds = DEFAULT_COUNTDOWN_SECONDS;
            }
            other => warn!("{}", other),
        }
    }

    settings
}

/// Write settings as pretty-printed JSON, creating the parent directory
pub fn save_settings(path: impl AsRef<Path>, settings: &Settings) -> ConfigResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json).map_err(ConfigError::WriteError)?;

    info!(config_path = %path.display(), "Settings saved");
    Ok(())
}
