//! Game server process supervision

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::{ExitStatus, HostError, HostResult, ServerLaunch, ServerSupervisor, Supervision};

/// Arguments the server gets after the jar
const SERVER_ARGS: &[&str] = &["nogui"];

impl ServerLaunch {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            jar_path: PathBuf::new(),
            working_dir: working_dir.into(),
        }
    }

    /// `<java> <jvm args> -jar <jar> nogui`, run inside `working_dir`.
    ///
    /// The jar path is made absolute against our own working directory first,
    /// since the child resolves it after changing into `working_dir`.
    pub fn java(
        java_command: &str,
        jvm_args: &[String],
        jar_path: &Path,
        working_dir: &Path,
    ) -> Self {
        let jar_path = std::path::absolute(jar_path).unwrap_or_else(|_| jar_path.to_path_buf());

        let mut args: Vec<String> = jvm_args.to_vec();
        args.push("-jar".into());
        args.push(jar_path.to_string_lossy().into_owned());
        args.extend(SERVER_ARGS.iter().map(|s| s.to_string()));

        Self {
            program: java_command.to_string(),
            args,
            jar_path,
            working_dir: working_dir.to_path_buf(),
        }
    }
}

/// Supervises the server as a direct child sharing our console
#[derive(Debug, Default, Clone)]
pub struct ConsoleSupervisor;

impl ConsoleSupervisor {
    pub fn new() -> Self {
        Self
    }

    async fn spawn_and_wait(launch: &ServerLaunch) -> HostResult<ExitStatus> {
        let mut cmd = Command::new(&launch.program);
        cmd.args(&launch.args)
            .current_dir(&launch.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| spawn_error(&launch.program, e))?;

        debug!(pid = ?child.id(), program = %launch.program, "Server spawned");

        let status = child.wait().await?;
        Ok(ExitStatus::from(status))
    }
}

fn spawn_error(program: &str, e: std::io::Error) -> HostError {
    match e.kind() {
        ErrorKind::PermissionDenied => {
            HostError::PermissionDenied(format!("Failed to spawn {}: {}", program, e))
        }
        _ => HostError::SpawnFailed(format!("Failed to spawn {}: {}", program, e)),
    }
}

#[async_trait]
impl ServerSupervisor for ConsoleSupervisor {
    async fn run(&self, launch: &ServerLaunch) -> Supervision {
        info!(
            program = %launch.program,
            args = ?launch.args,
            working_dir = %launch.working_dir.display(),
            "Launching server"
        );

        match Self::spawn_and_wait(launch).await {
            Ok(status) => {
                if status.is_success() {
                    info!("Server exited normally");
                } else {
                    warn!(status = %status, "Server exited abnormally");
                }
                Supervision::exited(status)
            }
            Err(e) => {
                warn!(error = %e, "Server could not be run");
                Supervision::launch_failed(&e)
            }
        }
    }
}
