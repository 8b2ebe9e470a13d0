//! A compositional parser-combinator engine for binary and textual formats,
//! built around packrat memoization and Warth et al.'s algorithm for direct
//! and indirect left recursion.
//!
//! # Overview
//!
//! Grammars are built from free functions ([`ch`], [`sequence`], [`many`],
//! [`indirect`], …) that each return an immutable [`combinator::P`] node.
//! Nodes compose into a DAG (cycles, for left-recursive or mutually
//! recursive grammars, go through [`indirect`]/[`bind_indirect`]). A built
//! grammar is run with [`parse`], which owns a private [`Arena`] for the
//! duration of one parse and returns a [`Token`] tree rooted wherever the
//! grammar's root combinator matched.
//!
//! The engine supports bit-level, endianness-aware input via
//! [`InputStream`], a chunked/incremental driver ([`chunked::SuspendedParse`])
//! for streaming input, and a backend-selection surface
//! ([`backend::ParserBackend`]) that names non-packrat backends as external
//! collaborators without implementing them here.
//!
//! # Example
//!
//! ```
//! use packrat_parser::{ch, sequence, parse, Arena, ParseState};
//!
//! let grammar = sequence(vec![ch(b'a'), ch(b'b'), ch(b'c')]);
//! let arena = Arena::new();
//! let state = ParseState::new(&arena);
//! let result = parse(&state, &grammar, b"abc").unwrap();
//! assert!(result.is_success());
//! ```
//!
//! # License
//! Provided as a single-crate parsing engine; see the repository root for
//! license terms.

mod arena;
mod charset;
pub mod backend;
pub mod chunked;
mod combinator;
mod error;
mod input;
mod packrat;
mod state;
pub mod unamb;
mod token;
mod util;

pub use arena::{Arena, ArenaStats};
pub use charset::CharSet;
pub use combinator::{
    bind_indirect, indirect, CombinatorExt, Combinator, Capabilities, IndirectSlot, P,
};
pub use combinator::{
    action, and, attr_bool, bind, bits, butnot, bytes, ch, ch_range, choice, difference, end,
    epsilon, free_value, get_value, ignore, in_set, int16, int32, int64, int8, int_range, left,
    length_value, many, many1, middle, not, not_in_set, nothing, optional, permutation, put_value,
    repeat_n, right, seek, sep_by, sep_by1, sequence, skip, tell, token, uint16, uint32, uint64,
    uint8, whitespace, with_endianness, xor,
};
pub use error::{ArenaError, BuildError, CompileError};
pub use input::{BitOrder, ByteOrder, Endianness, InputStream, Whence};
pub use packrat::parse;
pub use state::{ParseResult, ParseState};
pub use token::{
    allocate_token_new, allocate_token_type, get_token_type_name, get_token_type_number,
    CountedArray, Token, TokenKind, UnambWriter, TT_USER,
};
pub use util::Log;

#[cfg(test)]
mod __tests__;
