//! Cancellable shutdown countdown
//!
//! Two states: Ticking, then Resolved(Fired | Cancelled). The countdown is
//! the only writer of `remaining`; the cancel listener only ever raises the
//! shared [`CancelSignal`].

use msas_api::CountdownOutcome;
use std::time::Duration;
use tracing::debug;

use crate::CancelSignal;

/// Length of one countdown step
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Transient state, alive only while the countdown runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining: u32,
    pub cancelled: bool,
}

impl CountdownState {
    fn observe(&mut self, signal: &CancelSignal) -> bool {
        self.cancelled = signal.is_fired();
        self.cancelled
    }
}

/// Countdown of `total_seconds` steps
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    total_seconds: u32,
    tick: Duration,
}

impl Countdown {
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            tick: DEFAULT_TICK,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Run to resolution.
    ///
    /// Each step checks the signal, then calls `on_tick(remaining)`, then
    /// sleeps. After the last sleep the signal is checked once more, so a
    /// cancel that lands during the final second still wins. A cancel that
    /// arrives after that check is not seen.
    pub async fn run<F>(&self, signal: &CancelSignal, mut on_tick: F) -> CountdownOutcome
    where
        F: FnMut(u32),
    {
        let mut state = CountdownState {
            remaining: self.total_seconds,
            cancelled: false,
        };

        while state.remaining > 0 {
            if state.observe(signal) {
                debug!(remaining = state.remaining, "Countdown cancelled");
                return CountdownOutcome::Cancelled {
                    remaining: state.remaining,
                };
            }

            on_tick(state.remaining);
            tokio::time::sleep(self.tick).await;
            state.remaining -= 1;
        }

        if state.observe(signal) {
            debug!("Countdown cancelled at zero");
            CountdownOutcome::Cancelled { remaining: 0 }
        } else {
            debug!(total = self.total_seconds, "Countdown fired");
            CountdownOutcome::Fired
        }
    }
}
