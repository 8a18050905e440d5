//! The run flow: supervise, record, gate, count down, power off
//!
//! One pass per process. Every step that can fail degrades to the next
//! safe step rather than aborting: a history write failure is reported and
//! ignored, a failed power-off is reported and acknowledged.

use chrono::{DateTime, Local};
use msas_api::{CountdownOutcome, FlowEvent, RunOutcome, RunReport};
use msas_config::Settings;
use msas_host::{PowerController, ServerLaunch, ServerSupervisor};
use msas_store::HistoryStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{CancelSignal, Countdown, DEFAULT_TICK, FlowReporter, OperatorInput, ShutdownWindow};

/// Source of "now" for the stop instant and the window check
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Everything one run needs, injected
pub struct RunFlow {
    settings: Settings,
    server: Arc<dyn ServerSupervisor>,
    power: Arc<dyn PowerController>,
    history: Arc<dyn HistoryStore>,
    operator: Arc<dyn OperatorInput>,
    clock: Clock,
    tick: Duration,
}

impl RunFlow {
    pub fn new(
        settings: Settings,
        server: Arc<dyn ServerSupervisor>,
        power: Arc<dyn PowerController>,
        history: Arc<dyn HistoryStore>,
        operator: Arc<dyn OperatorInput>,
    ) -> Self {
        Self {
            settings,
            server,
            power,
            history,
            operator,
            clock: Arc::new(msas_util::now),
            tick: DEFAULT_TICK,
        }
    }

    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// The launch the flow will hand to the supervisor
    pub fn launch(&self) -> ServerLaunch {
        ServerLaunch::java(
            &self.settings.java_command,
            &self.settings.jvm_args,
            &self.settings.jar_path(),
            &self.settings.working_dir(),
        )
    }

    pub async fn run(&self, reporter: &mut dyn FlowReporter) -> RunReport {
        let outcome = self.supervise(reporter).await;
        self.record(&outcome, reporter);

        let window = ShutdownWindow::from_settings(&self.settings);
        if !window.permits(&outcome.stopped_at) {
            // Unrestricted windows always permit, so bounds are present here
            if let Some(bounds) = window.bounds() {
                info!(window = %bounds, "Stop time outside shutdown window");
                reporter.report(FlowEvent::OutsideWindow {
                    now: outcome.stopped_at,
                    window: *bounds,
                });
            }
            self.acknowledge(reporter).await;
            return RunReport::OutsideWindow;
        }

        match self.count_down(reporter).await {
            CountdownOutcome::Cancelled { remaining } => {
                info!(remaining, "Shutdown cancelled by operator");
                reporter.report(FlowEvent::CountdownCancelled { remaining });
                RunReport::Cancelled { remaining }
            }
            CountdownOutcome::Fired => self.power_off(reporter).await,
        }
    }

    async fn supervise(&self, reporter: &mut dyn FlowReporter) -> RunOutcome {
        let launch = self.launch();
        reporter.report(FlowEvent::ServerStarting {
            jar_path: launch.jar_path.clone(),
        });

        let supervision = self.server.run(&launch).await;
        let stopped_at = (self.clock)();
        info!(
            classification = ?supervision.classification,
            detail = ?supervision.detail,
            "Server stopped"
        );

        reporter.report(FlowEvent::ServerExited {
            classification: supervision.classification,
            detail: supervision.detail,
        });

        RunOutcome::new(stopped_at, supervision.classification)
    }

    fn record(&self, outcome: &RunOutcome, reporter: &mut dyn FlowReporter) {
        match self.history.append(outcome) {
            Ok(()) => reporter.report(FlowEvent::HistoryRecorded {
                location: self.history.location(),
            }),
            Err(e) => {
                warn!(error = %e, location = %self.history.location(), "Failed to record run");
                reporter.report(FlowEvent::HistoryWriteFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    async fn count_down(&self, reporter: &mut dyn FlowReporter) -> CountdownOutcome {
        let countdown = Countdown::new(self.settings.countdown_seconds).with_tick(self.tick);
        reporter.report(FlowEvent::CountdownStarted {
            total_seconds: countdown.total_seconds(),
        });

        let signal = CancelSignal::new();
        self.operator.listen_for_cancel(signal.clone());

        countdown
            .run(&signal, |remaining| {
                reporter.report(FlowEvent::CountdownTick { remaining })
            })
            .await
    }

    async fn power_off(&self, reporter: &mut dyn FlowReporter) -> RunReport {
        reporter.report(FlowEvent::ShutdownStarting);

        match self.power.power_off().await {
            Ok(()) => {
                info!("Power-off issued");
                RunReport::ShutdownIssued
            }
            Err(e) => {
                warn!(error = %e, "Power-off failed");
                let error = e.to_string();
                reporter.report(FlowEvent::ShutdownFailed {
                    error: error.clone(),
                });
                self.acknowledge(reporter).await;
                RunReport::ShutdownFailed { error }
            }
        }
    }

    async fn acknowledge(&self, reporter: &mut dyn FlowReporter) {
        reporter.report(FlowEvent::AwaitingAcknowledgment);
        self.operator.wait_for_enter().await;
        debug!("Operator acknowledged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingReporter, ScriptedOperator};
    use chrono::TimeZone;
    use msas_api::ExitClassification;
    use msas_host::{ExitStatus, MockPower, MockServer};
    use msas_store::MemoryHistory;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    struct Harness {
        server: Arc<MockServer>,
        power: Arc<MockPower>,
        history: Arc<MemoryHistory>,
        operator: Arc<ScriptedOperator>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                server: Arc::new(MockServer::exiting_with(ExitStatus::success())),
                power: Arc::new(MockPower::new()),
                history: Arc::new(MemoryHistory::new()),
                operator: Arc::new(ScriptedOperator::new()),
            }
        }

        fn flow(&self, settings: Settings, now: DateTime<Local>) -> RunFlow {
            RunFlow::new(
                settings,
                self.server.clone(),
                self.power.clone(),
                self.history.clone(),
                self.operator.clone(),
            )
            .with_clock(move || now)
        }
    }

    fn short_countdown() -> Settings {
        Settings {
            countdown_seconds: 3,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_powers_off() {
        let h = Harness::new();
        let mut reporter = RecordingReporter::new();

        let report = h.flow(short_countdown(), at(3, 0)).run(&mut reporter).await;

        assert_eq!(report, RunReport::ShutdownIssued);
        assert_eq!(h.power.calls(), 1);
        assert_eq!(reporter.ticks(), vec![3, 2, 1]);
        assert_eq!(h.operator.listens(), 1);
        assert_eq!(h.operator.acknowledgments(), 0);
        assert_eq!(reporter.events.last(), Some(&FlowEvent::ShutdownStarting));
    }

    #[tokio::test(start_paused = true)]
    async fn event_order() {
        let h = Harness::new();
        let mut reporter = RecordingReporter::new();
        let settings = Settings {
            countdown_seconds: 1,
            ..Default::default()
        };

        h.flow(settings, at(3, 0)).run(&mut reporter).await;

        let names: Vec<&str> = reporter
            .events
            .iter()
            .map(|e| match e {
                FlowEvent::ServerStarting { .. } => "starting",
                FlowEvent::ServerExited { .. } => "exited",
                FlowEvent::HistoryRecorded { .. } => "recorded",
                FlowEvent::CountdownStarted { .. } => "countdown",
                FlowEvent::CountdownTick { .. } => "tick",
                FlowEvent::ShutdownStarting => "shutdown",
                _ => "other",
            })
            .collect();
        assert_eq!(
            names,
            vec!["starting", "exited", "recorded", "countdown", "tick", "shutdown"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn launch_uses_configured_java() {
        let h = Harness::new();
        let settings = Settings {
            java_command: "/opt/jdk/bin/java".into(),
            jvm_args: vec!["-Xmx2G".into()],
            ..short_countdown()
        };

        h.flow(settings, at(3, 0))
            .run(&mut RecordingReporter::new())
            .await;

        let launches = h.server.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].program, "/opt/jdk/bin/java");
        assert_eq!(launches[0].args[0], "-Xmx2G");
        assert_eq!(launches[0].args[1], "-jar");
        assert!(launches[0].jar_path.is_absolute());
        assert!(launches[0].jar_path.ends_with("server/forge-server.jar"));
        assert_eq!(launches[0].working_dir, std::path::PathBuf::from("server"));
    }

    #[tokio::test(start_paused = true)]
    async fn outside_window_waits_for_acknowledgment() {
        let h = Harness::new();
        let mut reporter = RecordingReporter::new();

        let report = h.flow(short_countdown(), at(12, 0)).run(&mut reporter).await;

        assert_eq!(report, RunReport::OutsideWindow);
        assert_eq!(h.power.calls(), 0);
        assert_eq!(h.operator.listens(), 0);
        assert_eq!(h.operator.acknowledgments(), 1);
        assert!(reporter.contains(|e| matches!(
            e,
            FlowEvent::OutsideWindow { now, .. } if *now == at(12, 0)
        )));
        assert!(reporter.ticks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unparsable_window_permits_shutdown() {
        let h = Harness::new();
        let settings = Settings {
            shutdown_time_end: "8pm".into(),
            ..short_countdown()
        };

        let report = h
            .flow(settings, at(12, 0))
            .run(&mut RecordingReporter::new())
            .await;

        assert_eq!(report, RunReport::ShutdownIssued);
    }

    #[tokio::test(start_paused = true)]
    async fn history_failure_does_not_stop_flow() {
        let h = Harness {
            history: Arc::new(MemoryHistory::failing()),
            ..Harness::new()
        };
        let mut reporter = RecordingReporter::new();

        let report = h.flow(short_countdown(), at(3, 0)).run(&mut reporter).await;

        assert_eq!(report, RunReport::ShutdownIssued);
        assert!(reporter.contains(|e| matches!(e, FlowEvent::HistoryWriteFailed { .. })));
        assert!(!reporter.contains(|e| matches!(e, FlowEvent::HistoryRecorded { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn power_failure_is_reported_and_acknowledged() {
        let h = Harness {
            power: Arc::new(MockPower::failing("not permitted")),
            ..Harness::new()
        };
        let mut reporter = RecordingReporter::new();

        let report = h.flow(short_countdown(), at(3, 0)).run(&mut reporter).await;

        assert_eq!(
            report,
            RunReport::ShutdownFailed {
                error: "Command failed: not permitted".into()
            }
        );
        assert_eq!(h.operator.acknowledgments(), 1);
        assert_eq!(reporter.events.last(), Some(&FlowEvent::AwaitingAcknowledgment));
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_cancel_skips_ticks() {
        let h = Harness {
            operator: Arc::new(ScriptedOperator::cancelling_immediately()),
            ..Harness::new()
        };
        let mut reporter = RecordingReporter::new();

        let report = h.flow(short_countdown(), at(3, 0)).run(&mut reporter).await;

        assert_eq!(report, RunReport::Cancelled { remaining: 3 });
        assert!(reporter.ticks().is_empty());
        assert_eq!(h.power.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn spawn_failure_is_recorded_as_abnormal() {
        let h = Harness {
            server: Arc::new(MockServer::failing_to_spawn("java: not found")),
            ..Harness::new()
        };
        let mut reporter = RecordingReporter::new();

        h.flow(short_countdown(), at(3, 0)).run(&mut reporter).await;

        assert!(reporter.contains(|e| matches!(
            e,
            FlowEvent::ServerExited {
                classification: ExitClassification::Abnormal,
                detail: Some(_)
            }
        )));
        let entries = h.history.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("異常終了"));
    }
}
