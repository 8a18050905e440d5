//! Shutdown window gate

use chrono::{DateTime, Local};
use msas_config::Settings;
use msas_util::{TimeWindow, WallClock};
use tracing::info;

/// When automatic power-off is allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownWindow {
    /// Only inside this daily window
    Bounded(TimeWindow),

    /// Any time, because a boundary could not be parsed
    Unrestricted { reason: String },
}

impl ShutdownWindow {
    /// Parse both boundaries. Either one failing means unrestricted, so a
    /// damaged config never silently disables shutdown.
    pub fn parse(start: &str, end: &str) -> Self {
        match (WallClock::parse(start), WallClock::parse(end)) {
            (Ok(start), Ok(end)) => ShutdownWindow::Bounded(TimeWindow::new(start, end)),
            (start_result, end_result) => {
                let reason = [("start", start, start_result), ("end", end, end_result)]
                    .into_iter()
                    .filter_map(|(which, raw, result)| {
                        result.err().map(|e| format!("{} '{}': {}", which, raw, e))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                info!(%reason, "Shutdown window unparsable, allowing shutdown at any time");
                ShutdownWindow::Unrestricted { reason }
            }
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::parse(&settings.shutdown_time_start, &settings.shutdown_time_end)
    }

    pub fn permits(&self, now: &DateTime<Local>) -> bool {
        match self {
            ShutdownWindow::Bounded(window) => window.contains(now),
            ShutdownWindow::Unrestricted { .. } => true,
        }
    }

    pub fn bounds(&self) -> Option<&TimeWindow> {
        match self {
            ShutdownWindow::Bounded(window) => Some(window),
            ShutdownWindow::Unrestricted { .. } => None,
        }
    }
}

/// Whether `now` falls inside the `start`-`end` window, failing open.
pub fn is_within_window(now: &DateTime<Local>, start: &str, end: &str) -> bool {
    ShutdownWindow::parse(start, end).permits(now)
}
