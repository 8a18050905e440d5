//! Exit status of the supervised server

use msas_api::ExitClassification;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exit status from a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitStatus {
    /// Exit code if the process exited normally
    pub code: Option<i32>,

    /// Whether the process was signaled
    pub signaled: bool,

    /// Signal number if signaled (Unix)
    pub signal: Option<i32>,
}

impl ExitStatus {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            signaled: false,
            signal: None,
        }
    }

    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signaled: false,
            signal: None,
        }
    }

    pub fn signaled(signal: i32) -> Self {
        Self {
            code: None,
            signaled: true,
            signal: Some(signal),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn classification(&self) -> ExitClassification {
        if self.is_success() {
            ExitClassification::Normal
        } else {
            ExitClassification::Abnormal
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitStatus::with_code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(sig) = status.signal() {
                return ExitStatus::signaled(sig);
            }
        }

        ExitStatus::with_code(-1)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit status: {}", code),
            (None, Some(sig)) => write!(f, "terminated by {}", signal_name(sig)),
            (None, None) => write!(f, "unknown exit status"),
        }
    }
}

#[cfg(unix)]
fn signal_name(sig: i32) -> String {
    match nix::sys::signal::Signal::try_from(sig) {
        Ok(signal) => signal.as_str().to_string(),
        Err(_) => format!("signal {}", sig),
    }
}

#[cfg(not(unix))]
fn signal_name(sig: i32) -> String {
    format!("signal {}", sig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status() {
        assert!(ExitStatus::success().is_success());
        assert!(!ExitStatus::with_code(1).is_success());
        assert!(!ExitStatus::signaled(9).is_success());
    }

    #[test]
    fn classification_follows_exit_code() {
        assert_eq!(ExitStatus::success().classification(), ExitClassification::Normal);
        assert_eq!(ExitStatus::with_code(130).classification(), ExitClassification::Abnormal);
        assert_eq!(ExitStatus::signaled(15).classification(), ExitClassification::Abnormal);
    }

    #[test]
    fn display_forms() {
        assert_eq!(ExitStatus::with_code(2).to_string(), "exit status: 2");
        #[cfg(unix)]
        assert_eq!(ExitStatus::signaled(9).to_string(), "terminated by SIGKILL");
    }

    #[test]
    fn status_serialization() {
        let json = serde_json::to_string(&ExitStatus::signaled(15)).unwrap();
        let parsed: ExitStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ExitStatus::signaled(15));
    }
}
