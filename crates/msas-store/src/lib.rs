//! Persistence layer for msas
//!
//! Provides:
//! - The history ledger line format
//! - A file-backed history that keeps only the most recent runs
//! - An in-memory history for tests

mod entry;
mod file;
mod memory;
mod traits;

pub use entry::*;
pub use file::*;
pub use memory::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Entries kept in the history ledger
pub const HISTORY_CAPACITY: usize = 5;
