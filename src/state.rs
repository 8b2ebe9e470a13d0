//! Packrat bookkeeping: the memo table, the left-recursion call stack, and
//! the per-position "growth head" records used by the grow-the-seed
//! algorithm in `crate::packrat`.

use crate::arena::Arena;
use crate::input::InputStream;
use crate::token::Token;
use crate::util::Log;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// The outcome of parsing one combinator at one position: `token` is
/// `None` on failure, `Some` (possibly wrapping a `TokenKind::None`
/// payload) on success. `stream` reflects the cursor after consuming on
/// success, or is left unchanged from the attempt's starting point on
/// failure.
#[derive(Clone, Copy)]
pub struct ParseResult<'a> {
    pub token: Option<Token<'a>>,
    pub stream: InputStream<'a>,
}

impl<'a> ParseResult<'a> {
    pub fn fail(stream: InputStream<'a>) -> Self {
        Self { token: None, stream }
    }

    /// Fail, propagating a child's outcome: if the child's own attempt
    /// overran (wanted more input than was available), the returned
    /// failure keeps that child's stream (overrun set, cursor not
    /// restored) rather than the pre-attempt snapshot. This is the only
    /// case where a combinator does not fully backtrack on failure; it
    /// mirrors the reference implementation's choice to skip restoring
    /// its saved cursor when the inner parser set the sticky overrun
    /// flag, so that an overrun signal survives to the nearest consumer
    /// able to act on it (`many`, `not`, a chunked re-parse) instead of
    /// being silently absorbed into an ordinary backtrack.
    pub fn fail_from(original: InputStream<'a>, child: InputStream<'a>) -> Self {
        if child.overrun {
            Self::fail(child)
        } else {
            Self::fail(original)
        }
    }

    pub fn ok(token: Token<'a>, stream: InputStream<'a>) -> Self {
        Self {
            token: Some(token),
            stream,
        }
    }

    pub fn is_success(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared per-position state for a rule currently growing its seed.
pub(crate) struct Head {
    pub rule_id: u64,
    pub involved: RefCell<HashSet<u64>>,
    pub eval: RefCell<HashSet<u64>>,
}

/// A left-recursion marker planted in the memo table the first time a
/// rule is entered at a given position, before its body has produced a
/// result.
pub(crate) struct LrRecord<'a> {
    pub seed: RefCell<ParseResult<'a>>,
    pub rule_id: u64,
    pub head: RefCell<Option<Rc<Head>>>,
}

pub(crate) enum MemoAns<'a> {
    Result(ParseResult<'a>),
    Growing(Rc<LrRecord<'a>>),
}

pub(crate) struct MemoEntry<'a> {
    pub ans: RefCell<MemoAns<'a>>,
    pub pos: Cell<u64>,
}

/// All mutable state threaded through one top-level `parse` call.
pub struct ParseState<'a> {
    pub(crate) arena: &'a Arena,
    pub(crate) memo: RefCell<HashMap<(u64, u64), Rc<MemoEntry<'a>>>>,
    pub(crate) lr_stack: RefCell<Vec<Rc<LrRecord<'a>>>>,
    pub(crate) heads: RefCell<HashMap<u64, Rc<Head>>>,
    pub(crate) values: RefCell<HashMap<&'static str, Token<'a>>>,
    pub(crate) log: Log<&'static str>,
}

impl<'a> ParseState<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self::with_log(arena, Log::None)
    }

    pub fn with_log(arena: &'a Arena, log: Log<&'static str>) -> Self {
        Self {
            arena,
            memo: RefCell::new(HashMap::new()),
            lr_stack: RefCell::new(Vec::new()),
            heads: RefCell::new(HashMap::new()),
            values: RefCell::new(HashMap::new()),
            log,
        }
    }

    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// Number of distinct (rule, position) pairs memoized so far. Exposed
    /// for tests and diagnostics, not load-bearing for parsing itself.
    pub fn memo_len(&self) -> usize {
        self.memo.borrow().len()
    }
}
