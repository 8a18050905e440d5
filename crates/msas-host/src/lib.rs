//! Host integration for msas
//!
//! Provides:
//! - Trait interfaces for server supervision and power-off
//! - Server launch with inherited console streams and exit classification
//! - The native power-off command for the host OS
//! - Mocks for the run flow's tests

mod mock;
mod power;
mod process;
mod status;
mod traits;

pub use mock::*;
pub use power::*;
pub use process::*;
pub use status::*;
pub use traits::*;
