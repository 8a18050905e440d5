//! File-backed history ledger

use msas_api::RunOutcome;
use std::borrow::Cow;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::{HISTORY_CAPACITY, HistoryStore, StoreError, StoreResult, ledger_line};

/// Plain-text history, one line per run, most recent last.
///
/// Every append rewrites the whole file through a sibling temp file and a
/// rename, so a crash mid-write can lose the newest line but never reorders
/// or truncates the survivors.
pub struct FileHistory {
    path: PathBuf,
    capacity: usize,
    lock: Mutex<()>,
}

impl FileHistory {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, HISTORY_CAPACITY)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            lock: Mutex::new(()),
        }
    }

    /// Bytes that are not UTF-8 are replaced, never rejected.
    fn read_lines(&self) -> StoreResult<Vec<String>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                if let Cow::Owned(_) = content {
                    warn!(
                        path = %self.path.display(),
                        "History contains invalid UTF-8, replacing"
                    );
                }
                Ok(content
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string)
                    .collect())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("history"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn rewrite(&self, lines: &[String]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut content = lines.join("\n");
        content.push('\n');

        let tmp = self.temp_path();
        std::fs::write(&tmp, content)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl HistoryStore for FileHistory {
    fn append(&self, outcome: &RunOutcome) -> StoreResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::Unavailable("history lock poisoned".into()))?;

        let mut lines = match self.read_lines() {
            Ok(lines) => lines,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read history");
                return Err(e);
            }
        };

        lines.push(ledger_line(outcome));
        if lines.len() > self.capacity {
            lines.drain(..lines.len() - self.capacity);
        }

        self.rewrite(&lines)?;
        debug!(path = %self.path.display(), entries = lines.len(), "History written");
        Ok(())
    }

    fn entries(&self) -> StoreResult<Vec<String>> {
        self.read_lines()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
