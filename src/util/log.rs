use std::fmt::{Debug, Display, Formatter};

/// Debug-gated tracing verbosity for the packrat core.
///
/// Each level is a strict superset of the ones below it, and every
/// logging call is compiled out entirely in release builds.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<T: Display + Copy> Log<T> {
    /// Trace a packrat cache lookup outcome (hit, miss, left-recursion seed).
    pub fn log_cache<D: Debug>(&self, position: u64, outcome: &D) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Result(()).order() {
            println!("[{}; cache@{}]: {:?}", self, position, outcome);
        }
    }

    /// Trace one iteration of left-recursion seed growth.
    pub fn log_grow<D: Debug>(&self, position: u64, iteration: usize, outcome: &D) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Success(()).order() {
            println!(
                "[{}; grow@{} iter={}]: {:?}",
                self, position, iteration, outcome
            );
        }
    }
}
