//! Shared types for msas

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// How the supervised server process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitClassification {
    /// Exit code zero
    Normal,
    /// Non-zero exit, killed by a signal, or never started
    Abnormal,
}

impl ExitClassification {
    pub fn is_normal(&self) -> bool {
        matches!(self, ExitClassification::Normal)
    }
}

/// Outcome of one program run, recorded once after the server stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// When the server was observed to stop
    pub stopped_at: DateTime<Local>,

    pub classification: ExitClassification,
}

impl RunOutcome {
    pub fn new(stopped_at: DateTime<Local>, classification: ExitClassification) -> Self {
        Self {
            stopped_at,
            classification,
        }
    }
}

/// How a countdown resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CountdownOutcome {
    /// Reached zero with no cancellation observed
    Fired,
    /// Operator cancelled; `remaining` is the value at which it was observed
    Cancelled { remaining: u32 },
}

/// How a whole run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunReport {
    /// Stop time fell outside the shutdown window
    OutsideWindow,
    /// Countdown cancelled by the operator
    Cancelled { remaining: u32 },
    /// Power-off command ran successfully
    ShutdownIssued,
    /// Power-off command failed
    ShutdownFailed { error: String },
}

impl RunReport {
    pub fn shutdown_attempted(&self) -> bool {
        matches!(
            self,
            RunReport::ShutdownIssued | RunReport::ShutdownFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_serializes_snake_case() {
        let json = serde_json::to_string(&ExitClassification::Abnormal).unwrap();
        assert_eq!(json, "\"abnormal\"");
        assert!(ExitClassification::Normal.is_normal());
        assert!(!ExitClassification::Abnormal.is_normal());
    }

    #[test]
    fn countdown_outcome_tagging() {
        let json = serde_json::to_string(&CountdownOutcome::Cancelled { remaining: 3 }).unwrap();
        assert!(json.contains("\"type\":\"cancelled\""));
        assert!(json.contains("\"remaining\":3"));
    }

    #[test]
    fn only_shutdown_reports_attempt_power_off() {
        assert!(RunReport::ShutdownIssued.shutdown_attempted());
        assert!(RunReport::ShutdownFailed { error: "x".into() }.shutdown_attempted());
        assert!(!RunReport::OutsideWindow.shutdown_attempted());
        assert!(!RunReport::Cancelled { remaining: 2 }.shutdown_attempted());
    }
}
