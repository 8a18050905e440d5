//! Operator input: cancel listening and acknowledgment pauses

use async_trait::async_trait;
use std::io::BufRead;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::CancelSignal;

/// Where the run flow gets operator keypresses from
#[async_trait]
pub trait OperatorInput: Send + Sync {
    /// Start a detached listener that raises `signal` when the operator
    /// enters a line. The listener is never joined.
    fn listen_for_cancel(&self, signal: CancelSignal);

    /// Block until the operator presses Enter.
    async fn wait_for_enter(&self);
}

type LineReader = Arc<dyn Fn() + Send + Sync>;

/// Operator at the process's own terminal.
///
/// A cancel listener that is still blocked when the flow later asks for
/// acknowledgment owns the next line, so that line acknowledges instead of
/// a second read being queued behind it.
pub struct StdinOperator {
    read_line: LineReader,
    listener: Mutex<Option<oneshot::Receiver<()>>>,
}

impl StdinOperator {
    pub fn new() -> Self {
        Self::with_reader(read_one_line)
    }

    fn with_reader(read_line: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            read_line: Arc::new(read_line),
            listener: Mutex::new(None),
        }
    }

    fn take_listener(&self) -> Option<oneshot::Receiver<()>> {
        self.listener.lock().ok().and_then(|mut l| l.take())
    }
}

impl Default for StdinOperator {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads one line; EOF and read errors count as the line arriving.
fn read_one_line() {
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => debug!("stdin closed"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to read stdin"),
    }
}

#[async_trait]
impl OperatorInput for StdinOperator {
    fn listen_for_cancel(&self, signal: CancelSignal) {
        let (tx, rx) = oneshot::channel();
        let read_line = self.read_line.clone();

        // Not spawn_blocking: runtime shutdown waits on blocking tasks and
        // this read may never return.
        let spawned = std::thread::Builder::new()
            .name("cancel-listener".into())
            .spawn(move || {
                read_line();
                if signal.fire() {
                    debug!("Cancel requested by operator");
                }
                let _ = tx.send(());
            });

        match spawned {
            Ok(_) => {
                if let Ok(mut listener) = self.listener.lock() {
                    *listener = Some(rx);
                }
            }
            Err(e) => warn!(error = %e, "Could not start cancel listener"),
        }
    }

    async fn wait_for_enter(&self) {
        if let Some(listener) = self.take_listener() {
            if listener.await.is_ok() {
                debug!("Acknowledged through the cancel listener's line");
                return;
            }
        }

        let read_line = self.read_line.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || read_line()).await {
            warn!(error = %e, "Acknowledgment read task failed");
        }
    }
}

/// Operator driven by the test, not a terminal
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    pending: Mutex<Option<CancelSignal>>,
    cancel_on_listen: bool,
    listens: AtomicUsize,
    acknowledgments: AtomicUsize,
}

impl ScriptedOperator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An operator who presses Enter before the first tick
    pub fn cancelling_immediately() -> Self {
        Self {
            cancel_on_listen: true,
            ..Self::default()
        }
    }

    /// Simulate a line arriving at the active listener, if any
    pub fn press_enter(&self) -> bool {
        let signal = self.pending.lock().ok().and_then(|mut p| p.take());
        signal.is_some_and(|s| s.fire())
    }

    /// Times a cancel listener was started
    pub fn listens(&self) -> usize {
        self.listens.load(Ordering::SeqCst)
    }

    /// Times the flow paused for acknowledgment
    pub fn acknowledgments(&self) -> usize {
        self.acknowledgments.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OperatorInput for ScriptedOperator {
    fn listen_for_cancel(&self, signal: CancelSignal) {
        self.listens.fetch_add(1, Ordering::SeqCst);
        if self.cancel_on_listen {
            signal.fire();
            return;
        }
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(signal);
        }
    }

    async fn wait_for_enter(&self) {
        self.acknowledgments.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn press_enter_fires_pending_listener_once() {
        let operator = ScriptedOperator::new();
        let signal = CancelSignal::new();

        assert!(!operator.press_enter());

        operator.listen_for_cancel(signal.clone());
        assert!(!signal.is_fired());
        assert!(operator.press_enter());
        assert!(signal.is_fired());
        assert!(!operator.press_enter());
        assert_eq!(operator.listens(), 1);
    }

    #[test]
    fn immediate_cancel() {
        let operator = ScriptedOperator::cancelling_immediately();
        let signal = CancelSignal::new();
        operator.listen_for_cancel(signal.clone());
        assert!(signal.is_fired());
    }

    /// Lines fed from the test instead of a terminal
    fn fed_operator() -> (StdinOperator, mpsc::Sender<()>, Arc<AtomicUsize>) {
        let (tx, rx) = mpsc::channel::<()>();
        let rx = Arc::new(Mutex::new(rx));
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();
        let operator = StdinOperator::with_reader(move || {
            if let Ok(rx) = rx.lock() {
                let _ = rx.recv();
            }
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (operator, tx, reads)
    }

    #[tokio::test]
    async fn pending_listener_line_acknowledges() {
        let (operator, lines, reads) = fed_operator();
        let signal = CancelSignal::new();
        operator.listen_for_cancel(signal.clone());

        lines.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), operator.wait_for_enter())
            .await
            .expect("one line should acknowledge");

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(signal.is_fired());
    }

    #[tokio::test]
    async fn without_listener_acknowledgment_reads_a_line() {
        let (operator, lines, reads) = fed_operator();

        lines.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), operator.wait_for_enter())
            .await
            .expect("line should acknowledge");

        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn listener_line_is_used_once() {
        let (operator, lines, reads) = fed_operator();
        operator.listen_for_cancel(CancelSignal::new());

        lines.send(()).unwrap();
        operator.wait_for_enter().await;

        lines.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), operator.wait_for_enter())
            .await
            .expect("second acknowledgment should read its own line");
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn acknowledgments_are_counted() {
        let operator = ScriptedOperator::new();
        operator.wait_for_enter().await;
        operator.wait_for_enter().await;
        assert_eq!(operator.acknowledgments(), 2);
    }
}
