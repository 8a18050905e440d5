//! In-memory history for tests

use msas_api::RunOutcome;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{HISTORY_CAPACITY, HistoryStore, StoreError, StoreResult, ledger_line};

/// History held in memory, with the same eviction as the file store
pub struct MemoryHistory {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
    fail_writes: bool,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self {
            capacity: HISTORY_CAPACITY,
            lines: Mutex::new(VecDeque::new()),
            fail_writes: false,
        }
    }

    /// A history whose appends always fail
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&self, outcome: &RunOutcome) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }

        let mut lines = self
            .lines
            .lock()
            .map_err(|_| StoreError::Unavailable("history lock poisoned".into()))?;
        lines.push_back(ledger_line(outcome));
        while lines.len() > self.capacity {
            lines.pop_front();
        }
        Ok(())
    }

    fn entries(&self) -> StoreResult<Vec<String>> {
        let lines = self
            .lines
            .lock()
            .map_err(|_| StoreError::Unavailable("history lock poisoned".into()))?;
        Ok(lines.iter().cloned().collect())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}
