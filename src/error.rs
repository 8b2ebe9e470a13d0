use std::fmt::{Display, Formatter};

/// Failure to grow the arena backing a parse.
///
/// Every allocation site returns this as an explicit `Result`, and
/// callers bubble it up with `?` until `parse` turns it into `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaError {
    pub requested: usize,
}

impl Display for ArenaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ArenaError: backing allocator refused a {}-byte request",
            self.requested
        )
    }
}

impl std::error::Error for ArenaError {}

/// An error returned when constructing or wiring up a combinator graph
/// fails before any input is ever parsed (as opposed to an ordinary
/// parse failure, which is a value, not an error).
#[derive(Debug, Clone)]
pub struct BuildError {
    what: String,
    message: String,
}

impl BuildError {
    pub fn new(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuildError: {}-{}", self.what, self.message)
    }
}

impl std::error::Error for BuildError {}

/// An error returned when a backend cannot carry out a request.
///
/// Only `CompileError::UnsupportedBackend` is ever actually produced by
/// this crate (packrat is the only backend implemented here), but the
/// variant set covers the full backend-selection surface so callers can
/// match on it uniformly regardless of which backend name they requested.
#[derive(Debug, Clone)]
pub enum CompileError {
    UnsupportedBackend(String),
    InvalidParams(String),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::UnsupportedBackend(name) => {
                write!(f, "CompileError: backend '{}' is not implemented by this crate (it is an external collaborator)", name)
            }
            CompileError::InvalidParams(message) => {
                write!(f, "CompileError: invalid backend parameters: {}", message)
            }
        }
    }
}

impl std::error::Error for CompileError {}
