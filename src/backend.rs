//! Backend selection surface: a `ParserBackend` enum that names every
//! backend a caller might request, plus a `compile` entry point that only
//! actually succeeds for `Packrat` — the other variants name external
//! collaborators (per SPEC_FULL.md §1) that this crate does not implement.

use crate::combinator::P;
use crate::error::CompileError;
use std::fmt;
use std::str::FromStr;

/// A backend a grammar can be compiled against.
///
/// Only [`ParserBackend::Packrat`] is implemented by this crate; the others
/// round-trip through `Display`/`FromStr` so a caller can name them, but
/// [`compile`] rejects them with [`CompileError::UnsupportedBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserBackend {
    Packrat,
    /// Bounded-lookahead LL(k); `k` is the lookahead depth.
    Ll(u32),
    Lalr(u32),
    Glr(u32),
}

impl fmt::Display for ParserBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserBackend::Packrat => write!(f, "packrat"),
            ParserBackend::Ll(k) => write!(f, "ll({})", k),
            ParserBackend::Lalr(k) => write!(f, "lalr({})", k),
            ParserBackend::Glr(k) => write!(f, "glr({})", k),
        }
    }
}

impl FromStr for ParserBackend {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("packrat") {
            return Ok(ParserBackend::Packrat);
        }
        let (name, rest) = s
            .split_once('(')
            .ok_or_else(|| CompileError::InvalidParams(format!("malformed backend name '{}'", s)))?;
        let params = rest
            .strip_suffix(')')
            .ok_or_else(|| CompileError::InvalidParams(format!("unterminated parameter list in '{}'", s)))?;
        let k: u32 = params
            .trim()
            .parse()
            .map_err(|_| CompileError::InvalidParams(format!("expected a single integer parameter, got '{}'", params)))?;
        match name.trim().to_ascii_lowercase().as_str() {
            "ll" => Ok(ParserBackend::Ll(k)),
            "lalr" => Ok(ParserBackend::Lalr(k)),
            "glr" => Ok(ParserBackend::Glr(k)),
            other => Err(CompileError::UnsupportedBackend(other.to_string())),
        }
    }
}

/// A grammar bound to the backend it was compiled against. For `Packrat`,
/// running it is just `crate::parse` against the wrapped root node; other
/// backends never produce a `CompiledParser` since `compile` rejects them.
pub struct CompiledParser {
    pub backend: ParserBackend,
    pub root: P,
}

/// Select a backend for `root`. Only `ParserBackend::Packrat` is actually
/// implemented here; any other backend is accepted as a name but rejected
/// with `CompileError::UnsupportedBackend`, since those backends are
/// external collaborators this crate does not carry.
pub fn compile(root: P, backend: ParserBackend) -> Result<CompiledParser, CompileError> {
    match backend {
        ParserBackend::Packrat => Ok(CompiledParser { backend, root }),
        other => Err(CompileError::UnsupportedBackend(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::ch;

    #[test]
    fn packrat_round_trips_through_display_and_from_str() {
        let s = ParserBackend::Packrat.to_string();
        assert_eq!(s, "packrat");
        assert_eq!(ParserBackend::from_str(&s).unwrap(), ParserBackend::Packrat);
    }

    #[test]
    fn lalr_with_param_round_trips() {
        let s = ParserBackend::Lalr(1).to_string();
        assert_eq!(s, "lalr(1)");
        assert_eq!(ParserBackend::from_str(&s).unwrap(), ParserBackend::Lalr(1));
    }

    #[test]
    fn compile_accepts_packrat() {
        let root = ch(b'a');
        assert!(compile(root, ParserBackend::Packrat).is_ok());
    }

    #[test]
    fn compile_rejects_non_packrat_backend() {
        let root = ch(b'a');
        let err = compile(root, ParserBackend::Lalr(1)).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedBackend(_)));
    }

    #[test]
    fn from_str_rejects_malformed_param_list() {
        assert!(ParserBackend::from_str("lalr(x)").is_err());
    }
}
