//! Events reported by the run flow

use chrono::{DateTime, Local};
use msas_util::TimeWindow;
use std::path::PathBuf;

use crate::ExitClassification;

/// Everything the run flow wants the operator to see, in order
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// About to launch the server
    ServerStarting { jar_path: PathBuf },

    /// Server process is gone
    ServerExited {
        classification: ExitClassification,
        detail: Option<String>,
    },

    /// Outcome appended to the history log
    HistoryRecorded { location: String },

    /// History log could not be written; the run continues
    HistoryWriteFailed { error: String },

    /// Stop time is outside the shutdown window; no shutdown this run
    OutsideWindow {
        now: DateTime<Local>,
        window: TimeWindow,
    },

    /// Countdown began
    CountdownStarted { total_seconds: u32 },

    /// One second of the countdown, emitted before sleeping
    CountdownTick { remaining: u32 },

    /// Operator cancelled the countdown
    CountdownCancelled { remaining: u32 },

    /// Invoking the power-off command
    ShutdownStarting,

    /// Power-off command failed
    ShutdownFailed { error: String },

    /// Flow is blocked until the operator presses Enter
    AwaitingAcknowledgment,
}
