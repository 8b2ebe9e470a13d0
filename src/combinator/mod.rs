//! The combinator IR: immutable nodes describing a parser.
//!
//! Combinator kinds are modeled as one closed enum (`CombKind`) rather than
//! a vtable-per-kind, so the packrat evaluator (`crate::packrat`) can
//! dispatch with a single `match` instead of an indirect call per node.
//! User-supplied callbacks (`action`, `attr_bool`, `bind`) are the one
//! place genuine dynamic dispatch remains, since their bodies are
//! supplied by grammar authors.

mod build;
mod ext;
#[cfg(test)]
mod __tests__;

pub use build::*;
pub use ext::CombinatorExt;

use crate::arena::Arena;
use crate::charset::CharSet;
use crate::input::{Endianness, Whence};
use crate::token::Token;
use once_cell::unsync::OnceCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A parser node, built once and shared (via `Rc`) across however many
/// places in the grammar reference it.
pub type P = Rc<Combinator>;

pub type ActionFn = Rc<dyn for<'a> Fn(Token<'a>, &'a Arena) -> Token<'a>>;
pub type PredFn = Rc<dyn for<'a> Fn(&Token<'a>) -> bool>;
/// A continuation: given the just-parsed token, build the next parser to run.
pub type BindFn = Rc<dyn for<'a> Fn(&Token<'a>, &'a Arena) -> Option<P>>;

/// A late-bound placeholder slot for `indirect`.
///
/// Modeled as a once-set, `Rc`-shared interior-mutable cell rather than a
/// raw mutable pointer: the combinator graph stays a DAG of `Rc`s right
/// up until the slot is populated.
pub struct IndirectSlot(OnceCell<P>);

impl IndirectSlot {
    fn new() -> Self {
        Self(OnceCell::new())
    }

    pub fn get(&self) -> Option<&P> {
        self.0.get()
    }

    /// Bind the placeholder to its real parser. Fails if already bound.
    pub fn bind(&self, inner: P) -> Result<(), crate::error::BuildError> {
        self.0.set(inner).map_err(|_| {
            crate::error::BuildError::new(
                "indirect",
                "this indirection has already been bound to a parser",
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub is_valid_regular: bool,
    pub is_valid_cf: bool,
    pub is_higher_order: bool,
}

pub enum CombKind {
    // --- primitives (`is_higher_order = false`) ---
    Ch(u8),
    ChRange(u8, u8),
    InSet(CharSet),
    NotInSet(CharSet),
    Bits { n: u32, signed: bool },
    Bytes(usize),
    TokenLit(Rc<[u8]>),
    End,
    Epsilon,
    Nothing,
    Skip(u64),
    Seek { offset: i64, whence: Whence },
    Tell,

    // --- structural combinators ---
    Sequence(Vec<P>),
    Choice(Vec<P>),
    Left(P, P),
    Right(P, P),
    Middle(P, P, P),
    Optional(P),
    Ignore(P),
    Many(P),
    Many1(P),
    RepeatN(P, usize),
    SepBy(P, P),
    SepBy1(P, P),
    Butnot(P, P),
    Difference(P, P),
    Xor(P, P),
    Permutation(Vec<P>),
    And(P),
    Not(P),
    WithEndianness(Endianness, P),
    Indirect(Rc<IndirectSlot>),

    // --- combinators that break regular/CF validity ---
    Action(P, ActionFn),
    AttrBool(P, PredFn),
    Bind(P, BindFn),
    PutValue(P, &'static str),
    GetValue(&'static str),
    FreeValue(&'static str),

    // --- supplementary combinators ---
    /// `Whitespace(inner, skip)`: run `skip` greedily before `inner`.
    Whitespace(P, P),
    IntRange(P, i64, i64),
    LengthValue(P, P),
}

impl CombKind {
    fn name(&self) -> &'static str {
        match self {
            CombKind::Ch(_) => "ch",
            CombKind::ChRange(..) => "ch_range",
            CombKind::InSet(_) => "in",
            CombKind::NotInSet(_) => "not_in",
            CombKind::Bits { .. } => "bits",
            CombKind::Bytes(_) => "bytes",
            CombKind::TokenLit(_) => "token",
            CombKind::End => "end",
            CombKind::Epsilon => "epsilon",
            CombKind::Nothing => "nothing",
            CombKind::Skip(_) => "skip",
            CombKind::Seek { .. } => "seek",
            CombKind::Tell => "tell",
            CombKind::Sequence(_) => "sequence",
            CombKind::Choice(_) => "choice",
            CombKind::Left(..) => "left",
            CombKind::Right(..) => "right",
            CombKind::Middle(..) => "middle",
            CombKind::Optional(_) => "optional",
            CombKind::Ignore(_) => "ignore",
            CombKind::Many(_) => "many",
            CombKind::Many1(_) => "many1",
            CombKind::RepeatN(..) => "repeat_n",
            CombKind::SepBy(..) => "sepBy",
            CombKind::SepBy1(..) => "sepBy1",
            CombKind::Butnot(..) => "butnot",
            CombKind::Difference(..) => "difference",
            CombKind::Xor(..) => "xor",
            CombKind::Permutation(_) => "permutation",
            CombKind::And(_) => "and",
            CombKind::Not(_) => "not",
            CombKind::WithEndianness(..) => "with_endianness",
            CombKind::Indirect(_) => "indirect",
            CombKind::Action(..) => "action",
            CombKind::AttrBool(..) => "attr_bool",
            CombKind::Bind(..) => "bind",
            CombKind::PutValue(..) => "put_value",
            CombKind::GetValue(_) => "get_value",
            CombKind::FreeValue(_) => "free_value",
            CombKind::Whitespace(..) => "whitespace",
            CombKind::IntRange(..) => "int_range",
            CombKind::LengthValue(..) => "length_value",
        }
    }

    fn is_higher_order(&self) -> bool {
        !matches!(
            self,
            CombKind::Ch(_)
                | CombKind::ChRange(..)
                | CombKind::InSet(_)
                | CombKind::NotInSet(_)
                | CombKind::Bits { .. }
                | CombKind::Bytes(_)
                | CombKind::TokenLit(_)
                | CombKind::End
                | CombKind::Epsilon
                | CombKind::Nothing
                | CombKind::Skip(_)
                | CombKind::Seek { .. }
                | CombKind::Tell
        )
    }

    /// Whether this node itself (ignoring children) breaks regular/CF
    /// validity.
    fn breaks_regular_and_cf(&self) -> bool {
        matches!(
            self,
            CombKind::Action(..)
                | CombKind::AttrBool(..)
                | CombKind::Bind(..)
                | CombKind::PutValue(..)
                | CombKind::GetValue(_)
                | CombKind::FreeValue(_)
                | CombKind::Seek { .. }
                | CombKind::Tell
                | CombKind::Skip(_)
        )
    }

    fn children(&self) -> Vec<&P> {
        match self {
            CombKind::Sequence(ps) | CombKind::Choice(ps) | CombKind::Permutation(ps) => {
                ps.iter().collect()
            }
            CombKind::Left(p, q)
            | CombKind::Right(p, q)
            | CombKind::SepBy(p, q)
            | CombKind::SepBy1(p, q)
            | CombKind::Butnot(p, q)
            | CombKind::Difference(p, q)
            | CombKind::Xor(p, q)
            | CombKind::Whitespace(p, q)
            | CombKind::LengthValue(p, q) => vec![p, q],
            CombKind::Middle(p, x, q) => vec![p, x, q],
            CombKind::Optional(p)
            | CombKind::Ignore(p)
            | CombKind::Many(p)
            | CombKind::Many1(p)
            | CombKind::RepeatN(p, _)
            | CombKind::And(p)
            | CombKind::Not(p)
            | CombKind::WithEndianness(_, p)
            | CombKind::Action(p, _)
            | CombKind::AttrBool(p, _)
            | CombKind::Bind(p, _)
            | CombKind::PutValue(p, _)
            | CombKind::IntRange(p, _, _) => vec![p],
            CombKind::Indirect(_)
            | CombKind::GetValue(_)
            | CombKind::FreeValue(_)
            | CombKind::Ch(_)
            | CombKind::ChRange(..)
            | CombKind::InSet(_)
            | CombKind::NotInSet(_)
            | CombKind::Bits { .. }
            | CombKind::Bytes(_)
            | CombKind::TokenLit(_)
            | CombKind::End
            | CombKind::Epsilon
            | CombKind::Nothing
            | CombKind::Skip(_)
            | CombKind::Seek { .. }
            | CombKind::Tell => vec![],
        }
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub struct Combinator {
    /// Process-unique identity assigned at construction time; used as the
    /// non-pointer half of the packrat cache key.
    pub id: u64,
    pub kind: CombKind,
    pub caps: Capabilities,
}

impl std::fmt::Debug for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind.name(), self.id)
    }
}

impl Combinator {
    fn new(kind: CombKind) -> P {
        let is_higher_order = kind.is_higher_order();
        let own_breaks = kind.breaks_regular_and_cf();
        let children_valid = kind
            .children()
            .iter()
            .all(|c| c.caps.is_valid_regular && c.caps.is_valid_cf);
        let caps = Capabilities {
            is_valid_regular: !own_breaks && children_valid,
            is_valid_cf: !own_breaks && children_valid,
            is_higher_order,
        };
        Rc::new(Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            caps,
        })
    }
}
