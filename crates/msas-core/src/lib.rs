//! Shutdown decision core for msas
//!
//! This crate is the heart of msas, containing:
//! - The shutdown window gate (fail-open on unparsable boundaries)
//! - The one-shot cancel signal and the cancellable countdown
//!   (Ticking -> Fired | Cancelled)
//! - The run flow: supervise -> record -> gate -> countdown -> power off

mod cancel;
mod countdown;
mod flow;
mod gate;
mod operator;
mod report;

pub use cancel::*;
pub use countdown::*;
pub use flow::*;
pub use gate::*;
pub use operator::*;
pub use report::*;
