//! Host power-off
//!
//! One native command per OS, asking for an immediate shutdown. The grace
//! period has already been spent in the countdown, so no delay is passed.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use crate::{HostError, HostResult, PowerController};

/// Program and arguments of a power-off command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PowerCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The host's own immediate power-off invocation
    #[cfg(windows)]
    pub fn native() -> Self {
        Self::new(r"C:\Windows\System32\shutdown.exe", &["/s", "/t", "0"])
    }

    /// The host's own immediate power-off invocation
    #[cfg(not(windows))]
    pub fn native() -> Self {
        Self::new("shutdown", &["-h", "now"])
    }
}

impl Default for PowerCommand {
    fn default() -> Self {
        Self::native()
    }
}

/// Runs a power-off command with the console attached
#[derive(Debug, Clone, Default)]
pub struct SystemPower {
    command: PowerCommand,
}

impl SystemPower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(command: PowerCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl PowerController for SystemPower {
    async fn power_off(&self) -> HostResult<()> {
        let PowerCommand { program, args } = &self.command;
        info!(program = %program, args = ?args, "Requesting power-off");

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::PermissionDenied => {
                    HostError::PermissionDenied(format!("{}: {}", program, e))
                }
                _ => HostError::SpawnFailed(format!("{}: {}", program, e)),
            })?;

        if status.success() {
            Ok(())
        } else {
            warn!(program = %program, status = %status, "Power-off command failed");
            Err(HostError::CommandFailed(format!("{} {}", program, status)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_command_is_immediate() {
        let cmd = PowerCommand::native();
        #[cfg(not(windows))]
        {
            assert_eq!(cmd.program, "shutdown");
            assert_eq!(cmd.args, vec!["-h", "now"]);
        }
        #[cfg(windows)]
        assert_eq!(cmd.args, vec!["/s", "/t", "0"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_command() {
        let power = SystemPower::with_command(PowerCommand::new("true", &[]));
        assert!(power.power_off().await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_error() {
        let power = SystemPower::with_command(PowerCommand::new("false", &[]));
        assert!(matches!(power.power_off().await, Err(HostError::CommandFailed(_))));
    }

    #[tokio::test]
    async fn missing_command_is_error() {
        let power = SystemPower::with_command(PowerCommand::new("msas-no-such-poweroff", &[]));
        let err = power.power_off().await.unwrap_err();
        assert!(matches!(err, HostError::SpawnFailed(_)));
        assert!(err.to_string().contains("msas-no-such-poweroff"));
    }
}
