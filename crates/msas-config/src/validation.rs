//! Settings validation

use msas_util::WallClock;
use thiserror::Error;

use crate::schema::Settings;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("countdown_seconds must be a positive integer")]
    NonPositiveCountdown,

    #[error("Invalid time format '{value}' for {field}: {message}")]
    InvalidTimeFormat {
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("server_jar cannot be empty")]
    EmptyServerJar,

    #[error("java_command cannot be empty")]
    EmptyJavaCommand,
}

/// Validate settings, collecting every problem
pub fn validate_settings(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if settings.countdown_seconds == 0 {
        errors.push(ValidationError::NonPositiveCountdown);
    }

    if settings.server_jar.is_empty() {
        errors.push(ValidationError::EmptyServerJar);
    }

    if settings.java_command.is_empty() {
        errors.push(ValidationError::EmptyJavaCommand);
    }

    errors.extend(validate_time("shutdown_time_start", &settings.shutdown_time_start));
    errors.extend(validate_time("shutdown_time_end", &settings.shutdown_time_end));

    errors
}

fn validate_time(field: &'static str, value: &str) -> Option<ValidationError> {
    parse_time(value)
        .err()
        .map(|message| ValidationError::InvalidTimeFormat {
            field,
            value: value.to_string(),
            message,
        })
}

/// Parse HH:MM time format
pub fn parse_time(s: &str) -> Result<(u8, u8), String> {
    WallClock::parse(s)
        .map(|clock| (clock.hour, clock.minute))
        .map_err(|e| e.to_string())
}

/// Parse a countdown entered by the operator
pub fn parse_countdown_seconds(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&secs| secs > 0)
}
