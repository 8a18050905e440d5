//! Shared utilities for msas
//!
//! This crate provides:
//! - Wall-clock time and daily time windows (for the shutdown window)
//! - `now()` with mock time support in debug builds
//! - Default paths for the config and history files

mod paths;
mod time;

pub use paths::*;
pub use time::*;
