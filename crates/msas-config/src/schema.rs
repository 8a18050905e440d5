//! Settings schema (as stored in `config.json`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_FOLDER: &str = "server";
pub const DEFAULT_SERVER_JAR: &str = "forge-server.jar";
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 60;
pub const DEFAULT_SHUTDOWN_TIME_START: &str = "02:00";
pub const DEFAULT_SHUTDOWN_TIME_END: &str = "08:00";
pub const DEFAULT_JAVA_COMMAND: &str = "java";
pub const DEFAULT_JVM_ARGS: &[&str] = &["-Xmx4G"];

/// Persisted settings
///
/// Every field falls back to its default when missing from the file, so a
/// config written by an older version still loads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Folder containing the server jar; also the server's working directory
    pub server_folder: String,

    /// Jar file name inside `server_folder`
    pub server_jar: String,

    /// Seconds between server exit and power-off
    pub countdown_seconds: u32,

    /// Start of the daily shutdown window, `HH:MM`, inclusive
    pub shutdown_time_start: String,

    /// End of the daily shutdown window, `HH:MM`, exclusive
    pub shutdown_time_end: String,

    /// Java executable used to launch the server
    pub java_command: String,

    /// JVM options placed before `-jar`
    pub jvm_args: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_folder: DEFAULT_SERVER_FOLDER.into(),
            server_jar: DEFAULT_SERVER_JAR.into(),
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            shutdown_time_start: DEFAULT_SHUTDOWN_TIME_START.into(),
            shutdown_time_end: DEFAULT_SHUTDOWN_TIME_END.into(),
            java_command: DEFAULT_JAVA_COMMAND.into(),
            jvm_args: DEFAULT_JVM_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Working directory for the server; `.` when no folder is configured
    pub fn working_dir(&self) -> PathBuf {
        if self.server_folder.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&self.server_folder)
        }
    }

    /// Jar path relative to the directory msas was started from
    pub fn jar_path(&self) -> PathBuf {
        Path::new(&self.server_folder).join(&self.server_jar)
    }
}
