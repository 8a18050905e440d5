//! Default paths for msas
//!
//! Everything lives in one data directory, relative to the directory the
//! program is started from so the tool can sit next to the server folder:
//! - Config: `<data dir>/config.json`
//! - History: `<data dir>/System.log`

use std::path::{Path, PathBuf};

/// Environment variable for overriding the data directory
pub const MSAS_DATA_DIR_ENV: &str = "MSAS_DATA_DIR";

/// Data directory name used when nothing overrides it
const APP_DIR: &str = "MSAS";

const CONFIG_FILENAME: &str = "config.json";

const HISTORY_FILENAME: &str = "System.log";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$MSAS_DATA_DIR` environment variable (if set and non-empty)
/// 2. `./MSAS` (fallback)
pub fn default_data_dir() -> PathBuf {
    match std::env::var(MSAS_DATA_DIR_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => data_dir_without_env(),
    }
}

/// Get the data directory without checking the MSAS_DATA_DIR env var.
pub fn data_dir_without_env() -> PathBuf {
    PathBuf::from(APP_DIR)
}

/// Settings file inside `data_dir`
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILENAME)
}

/// History log inside `data_dir`
pub fn history_path(data_dir: &Path) -> PathBuf {
    data_dir.join(HISTORY_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_msas() {
        assert_eq!(data_dir_without_env(), PathBuf::from("MSAS"));
    }

    #[test]
    fn files_live_in_data_dir() {
        let dir = PathBuf::from("/srv/mc/MSAS");
        assert_eq!(config_path(&dir), PathBuf::from("/srv/mc/MSAS/config.json"));
        assert_eq!(history_path(&dir), PathBuf::from("/srv/mc/MSAS/System.log"));
    }
}
