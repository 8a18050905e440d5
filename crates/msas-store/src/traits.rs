//! Store trait definitions

use msas_api::RunOutcome;

use crate::StoreResult;

/// Bounded history of run outcomes
pub trait HistoryStore: Send + Sync {
    /// Append an outcome, evicting the oldest entries past capacity
    fn append(&self, outcome: &RunOutcome) -> StoreResult<()>;

    /// Current ledger lines, oldest first
    fn entries(&self) -> StoreResult<Vec<String>>;

    /// Where the ledger lives, for display
    fn location(&self) -> String;
}
