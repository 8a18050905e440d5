//! Host traits

use async_trait::async_trait;
use msas_api::ExitClassification;
use std::path::PathBuf;
use thiserror::Error;

use crate::ExitStatus;

/// Errors from host operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HostResult<T> = Result<T, HostError>;

/// Everything needed to start the game server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLaunch {
    pub program: String,
    pub args: Vec<String>,

    /// Jar being launched, for display
    pub jar_path: PathBuf,

    pub working_dir: PathBuf,
}

/// Result of supervising one server run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supervision {
    pub classification: ExitClassification,

    /// None when the process never started
    pub status: Option<ExitStatus>,

    /// Why the run was abnormal
    pub detail: Option<String>,
}

impl Supervision {
    pub fn exited(status: ExitStatus) -> Self {
        let classification = status.classification();
        let detail = (!status.is_success()).then(|| status.to_string());
        Self {
            classification,
            status: Some(status),
            detail,
        }
    }

    pub fn launch_failed(error: &HostError) -> Self {
        Self {
            classification: ExitClassification::Abnormal,
            status: None,
            detail: Some(error.to_string()),
        }
    }
}

/// Runs the server to completion
#[async_trait]
pub trait ServerSupervisor: Send + Sync {
    /// Launch and wait for exit. Launch failures are reported as an
    /// abnormal `Supervision`, never retried.
    async fn run(&self, launch: &ServerLaunch) -> Supervision;
}

/// Powers the host off
#[async_trait]
pub trait PowerController: Send + Sync {
    /// Request an immediate, unconditional power-off.
    async fn power_off(&self) -> HostResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_exit_has_no_detail() {
        let s = Supervision::exited(ExitStatus::success());
        assert_eq!(s.classification, ExitClassification::Normal);
        assert!(s.detail.is_none());
    }

    #[test]
    fn failed_exit_carries_reason() {
        let s = Supervision::exited(ExitStatus::with_code(1));
        assert_eq!(s.classification, ExitClassification::Abnormal);
        assert_eq!(s.detail.as_deref(), Some("exit status: 1"));
    }

    #[test]
    fn launch_failure_is_abnormal() {
        let s = Supervision::launch_failed(&HostError::SpawnFailed("java: not found".into()));
        assert_eq!(s.classification, ExitClassification::Abnormal);
        assert!(s.status.is_none());
        assert_eq!(s.detail.as_deref(), Some("Spawn failed: java: not found"));
    }
}
