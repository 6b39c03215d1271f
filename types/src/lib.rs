//! Martingale simulator domain types.
//!
//! Defines round outcomes, run history, configuration and the result/summary
//! snapshots shared by the execution layer and hosts.

mod config;
mod constants;
mod round;
mod summary;

pub use config::*;
pub use constants::*;
pub use round::*;
pub use summary::*;
