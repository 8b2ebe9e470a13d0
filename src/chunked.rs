//! The chunked/incremental parse driver (`parse_start`, `push_chunk`,
//! `finish`), layered over the single-shot [`crate::parse`].
//!
//! The reference implementation's chunked API is documented as a stub: it
//! only ever performs one real underlying parse, executed when the caller
//! signals there is no more input. This driver preserves that "single
//! effective parse" property, but resolves it by stashing every pushed
//! chunk into one contiguous buffer and parsing the concatenation exactly
//! once in [`SuspendedParse::finish`] with `last_chunk = true` — rather than
//! the reference's narrower behavior of parsing only the first chunk ever
//! pushed. Concatenating is necessary for a literal like `token("foobar")`
//! to match when it is split across chunk boundaries (see SPEC_FULL.md §8
//! scenario 6); parsing only the first chunk cannot satisfy that contract.
//! `end()` and `seek(END)` still only see `last_chunk = true` at `finish`,
//! which already gives them correct semantics under a full re-parse.
//!
//! The arena is supplied by the caller at `finish` time (not owned by this
//! handle) so the result's borrowed tokens have a normal, non-self-
//! referential lifetime tied to a place the caller controls, the same
//! convention [`crate::parse`] already uses.

use crate::arena::Arena;
use crate::combinator::P;
use crate::error::ArenaError;
use crate::state::{ParseResult, ParseState};
use crate::util::Log;

/// A parse in progress across an unknown number of input chunks.
///
/// Holds only the stashed bytes and the grammar root; a caller abandons an
/// in-progress chunked parse simply by dropping it.
pub struct SuspendedParse {
    root: P,
    buffer: Vec<u8>,
    log: Log<&'static str>,
}

impl SuspendedParse {
    /// Begin a chunked parse against `root`.
    pub fn start(root: P) -> Self {
        Self {
            root,
            buffer: Vec::new(),
            log: Log::None,
        }
    }

    pub fn with_log(root: P, log: Log<&'static str>) -> Self {
        Self {
            root,
            buffer: Vec::new(),
            log,
        }
    }

    /// Append another chunk of input. No parsing happens here; the bytes
    /// are only stashed.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Signal that no further chunks are coming, and run the one real
    /// parse against everything pushed so far, copied into `arena`.
    pub fn finish<'a>(self, arena: &'a Arena) -> Result<ParseResult<'a>, ArenaError> {
        let input = arena.alloc_slice_copy(&self.buffer)?;
        let state = ParseState::with_log(arena, self.log);
        crate::packrat::parse(&state, &self.root, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::token;
    use crate::unamb::write_result_unamb;

    #[test]
    fn chunks_concatenate_before_the_single_real_parse() {
        let mut sp = SuspendedParse::start(token(b"foobar"));
        sp.push_chunk(b"foo");
        sp.push_chunk(b"bar");
        let arena = Arena::new();
        let result = sp.finish(&arena).unwrap();
        assert!(result.is_success());
        assert_eq!(
            write_result_unamb(&result.token.unwrap()),
            "<66.6f.6f.62.61.72>"
        );
    }

    #[test]
    fn mismatched_chunk_tail_fails() {
        let mut sp = SuspendedParse::start(token(b"foobar"));
        sp.push_chunk(b"foo");
        sp.push_chunk(b"baz");
        let arena = Arena::new();
        let result = sp.finish(&arena).unwrap();
        assert!(!result.is_success());
    }
}
