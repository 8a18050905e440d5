//! Mock host implementations for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    ExitStatus, HostError, HostResult, PowerController, ServerLaunch, ServerSupervisor,
    Supervision,
};

/// Server that "runs" instantly and ends the way it was told to
pub struct MockServer {
    outcome: MockExit,
    launches: Arc<Mutex<Vec<ServerLaunch>>>,
}

/// How the mock server ends
#[derive(Debug, Clone)]
pub enum MockExit {
    Status(ExitStatus),
    SpawnFailure(String),
}

impl MockServer {
    pub fn exiting_with(status: ExitStatus) -> Self {
        Self {
            outcome: MockExit::Status(status),
            launches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_to_spawn(reason: impl Into<String>) -> Self {
        Self {
            outcome: MockExit::SpawnFailure(reason.into()),
            launches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Launches received so far
    pub fn launches(&self) -> Vec<ServerLaunch> {
        self.launches.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ServerSupervisor for MockServer {
    async fn run(&self, launch: &ServerLaunch) -> Supervision {
        if let Ok(mut launches) = self.launches.lock() {
            launches.push(launch.clone());
        }

        match self.outcome.clone() {
            MockExit::Status(status) => Supervision::exited(status),
            MockExit::SpawnFailure(reason) => {
                Supervision::launch_failed(&HostError::SpawnFailed(reason))
            }
        }
    }
}

/// Power controller that counts calls instead of powering off
#[derive(Default)]
pub struct MockPower {
    calls: AtomicUsize,

    /// Configure power-off to fail
    pub fail: Mutex<Option<String>>,
}

impl MockPower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: Mutex::new(Some(reason.into())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PowerController for MockPower {
    async fn power_off(&self) -> HostResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.fail.lock().ok().and_then(|f| f.clone());
        match failure {
            Some(reason) => Err(HostError::CommandFailed(reason)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msas_api::ExitClassification;

    #[tokio::test]
    async fn mock_server_records_launch() {
        let server = MockServer::exiting_with(ExitStatus::with_code(1));
        let launch = ServerLaunch::new("java", vec![], ".");

        let result = server.run(&launch).await;
        assert_eq!(result.classification, ExitClassification::Abnormal);
        assert_eq!(server.launches(), vec![launch]);
    }

    #[tokio::test]
    async fn mock_power_counts_and_fails_on_request() {
        let power = MockPower::new();
        power.power_off().await.unwrap();
        assert_eq!(power.calls(), 1);

        let failing = MockPower::failing("access denied");
        assert!(failing.power_off().await.is_err());
        assert_eq!(failing.calls(), 1);
    }
}
