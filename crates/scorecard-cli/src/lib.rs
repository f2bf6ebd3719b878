//! Library components behind the `scorecard` binary.

pub mod logging;
pub mod pipeline;
pub mod types;
