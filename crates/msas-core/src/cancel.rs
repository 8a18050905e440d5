//! One-shot cancel signal

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set at most once by the listener, read repeatedly by the countdown.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    fired: Arc<AtomicBool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Returns true only for the call that raised it.
    pub fn fire(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}
