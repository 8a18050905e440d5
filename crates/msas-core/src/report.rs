//! Reporting flow events to the operator

use msas_api::FlowEvent;

/// Receives every event the run flow emits, in order
pub trait FlowReporter: Send {
    fn report(&mut self, event: FlowEvent);
}

type Hook = Box<dyn FnMut(&FlowEvent) + Send>;

/// Keeps events for assertions, optionally reacting to each one
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<FlowEvent>,
    hook: Option<Hook>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` on each event before recording it
    pub fn with_hook(hook: impl FnMut(&FlowEvent) + Send + 'static) -> Self {
        Self {
            events: Vec::new(),
            hook: Some(Box::new(hook)),
        }
    }

    /// Remaining-seconds values that were rendered
    pub fn ticks(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FlowEvent::CountdownTick { remaining } => Some(*remaining),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, predicate: impl Fn(&FlowEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

impl FlowReporter for RecordingReporter {
    fn report(&mut self, event: FlowEvent) {
        if let Some(hook) = self.hook.as_mut() {
            hook(&event);
        }
        self.events.push(event);
    }
}
