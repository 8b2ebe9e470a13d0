//! Small ambient helpers shared across the engine: debug-gated tracing and
//! the handful of bit-twiddling helpers used by more than one module.
mod log;

pub use log::Log;
