//! Shared types for msas
//!
//! This crate defines the values that cross crate boundaries:
//! - How the server process ended
//! - The per-run outcome written to the history log
//! - How a countdown resolved, and how the whole run ended
//! - Events the run flow reports to the console

mod events;
mod types;

pub use events::*;
pub use types::*;
