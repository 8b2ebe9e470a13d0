//! Free functions that construct combinator nodes. This is the primary
//! public API grammar authors call.

use super::{ActionFn, BindFn, CombKind, Combinator, IndirectSlot, PredFn, P};
use crate::arena::Arena;
use crate::charset::CharSet;
use crate::input::{Endianness, Whence};
use crate::token::Token;
use std::rc::Rc;

pub fn ch(byte: u8) -> P {
    Combinator::new(CombKind::Ch(byte))
}

pub fn ch_range(lo: u8, hi: u8) -> P {
    Combinator::new(CombKind::ChRange(lo, hi))
}

pub fn in_set(set: CharSet) -> P {
    Combinator::new(CombKind::InSet(set))
}

pub fn not_in_set(set: CharSet) -> P {
    Combinator::new(CombKind::NotInSet(set))
}

pub fn bits(n: u32, signed: bool) -> P {
    Combinator::new(CombKind::Bits { n, signed })
}

pub fn bytes(n: usize) -> P {
    Combinator::new(CombKind::Bytes(n))
}

/// Shorthand for `bits(8, true)`.
pub fn int8() -> P {
    bits(8, true)
}

/// Shorthand for `bits(16, true)`.
pub fn int16() -> P {
    bits(16, true)
}

/// Shorthand for `bits(32, true)`.
pub fn int32() -> P {
    bits(32, true)
}

/// Shorthand for `bits(64, true)`.
pub fn int64() -> P {
    bits(64, true)
}

/// Shorthand for `bits(8, false)`.
pub fn uint8() -> P {
    bits(8, false)
}

/// Shorthand for `bits(16, false)`.
pub fn uint16() -> P {
    bits(16, false)
}

/// Shorthand for `bits(32, false)`.
pub fn uint32() -> P {
    bits(32, false)
}

/// Shorthand for `bits(64, false)`.
pub fn uint64() -> P {
    bits(64, false)
}

pub fn token(literal: &[u8]) -> P {
    Combinator::new(CombKind::TokenLit(Rc::from(literal)))
}

pub fn end() -> P {
    Combinator::new(CombKind::End)
}

pub fn epsilon() -> P {
    Combinator::new(CombKind::Epsilon)
}

pub fn nothing() -> P {
    Combinator::new(CombKind::Nothing)
}

pub fn skip(n: u64) -> P {
    Combinator::new(CombKind::Skip(n))
}

pub fn seek(offset: i64, whence: Whence) -> P {
    Combinator::new(CombKind::Seek { offset, whence })
}

pub fn tell() -> P {
    Combinator::new(CombKind::Tell)
}

pub fn sequence(parts: Vec<P>) -> P {
    Combinator::new(CombKind::Sequence(parts))
}

pub fn choice(alts: Vec<P>) -> P {
    Combinator::new(CombKind::Choice(alts))
}

pub fn left(keep: P, drop: P) -> P {
    Combinator::new(CombKind::Left(keep, drop))
}

pub fn right(drop: P, keep: P) -> P {
    Combinator::new(CombKind::Right(drop, keep))
}

pub fn middle(drop_left: P, keep: P, drop_right: P) -> P {
    Combinator::new(CombKind::Middle(drop_left, keep, drop_right))
}

pub fn optional(inner: P) -> P {
    Combinator::new(CombKind::Optional(inner))
}

pub fn ignore(inner: P) -> P {
    Combinator::new(CombKind::Ignore(inner))
}

pub fn many(inner: P) -> P {
    Combinator::new(CombKind::Many(inner))
}

pub fn many1(inner: P) -> P {
    Combinator::new(CombKind::Many1(inner))
}

pub fn repeat_n(inner: P, n: usize) -> P {
    Combinator::new(CombKind::RepeatN(inner, n))
}

pub fn sep_by(item: P, sep: P) -> P {
    Combinator::new(CombKind::SepBy(item, sep))
}

pub fn sep_by1(item: P, sep: P) -> P {
    Combinator::new(CombKind::SepBy1(item, sep))
}

pub fn butnot(inner: P, exclude: P) -> P {
    Combinator::new(CombKind::Butnot(inner, exclude))
}

pub fn difference(a: P, b: P) -> P {
    Combinator::new(CombKind::Difference(a, b))
}

pub fn xor(a: P, b: P) -> P {
    Combinator::new(CombKind::Xor(a, b))
}

pub fn permutation(parts: Vec<P>) -> P {
    Combinator::new(CombKind::Permutation(parts))
}

pub fn and(inner: P) -> P {
    Combinator::new(CombKind::And(inner))
}

pub fn not(inner: P) -> P {
    Combinator::new(CombKind::Not(inner))
}

pub fn with_endianness(endianness: Endianness, inner: P) -> P {
    Combinator::new(CombKind::WithEndianness(endianness, inner))
}

/// Create a placeholder that must be bound (via `IndirectSlot::bind`, or
/// [`bind_indirect`]) before the grammar it belongs to is ever run. Used
/// to write cyclic (mutually or directly left-recursive) grammars without
/// needing cyclic ownership of combinator nodes.
pub fn indirect() -> (P, Rc<IndirectSlot>) {
    let slot = Rc::new(IndirectSlot::new());
    let node = Combinator::new(CombKind::Indirect(slot.clone()));
    (node, slot)
}

/// Bind a placeholder created by [`indirect`] to its real parser.
pub fn bind_indirect(slot: &IndirectSlot, inner: P) -> Result<(), crate::error::BuildError> {
    slot.bind(inner)
}

pub fn action<F>(inner: P, f: F) -> P
where
    F: for<'a> Fn(Token<'a>, &'a Arena) -> Token<'a> + 'static,
{
    Combinator::new(CombKind::Action(inner, Rc::new(f) as ActionFn))
}

pub fn attr_bool<F>(inner: P, f: F) -> P
where
    F: for<'a> Fn(&Token<'a>) -> bool + 'static,
{
    Combinator::new(CombKind::AttrBool(inner, Rc::new(f) as PredFn))
}

pub fn bind<F>(inner: P, f: F) -> P
where
    F: for<'a> Fn(&Token<'a>, &'a Arena) -> Option<P> + 'static,
{
    Combinator::new(CombKind::Bind(inner, Rc::new(f) as BindFn))
}

pub fn put_value(inner: P, name: &'static str) -> P {
    Combinator::new(CombKind::PutValue(inner, name))
}

pub fn get_value(name: &'static str) -> P {
    Combinator::new(CombKind::GetValue(name))
}

pub fn free_value(name: &'static str) -> P {
    Combinator::new(CombKind::FreeValue(name))
}

/// Skip zero or more bytes matched by `ws` before `inner`.
pub fn whitespace(inner: P, ws: P) -> P {
    Combinator::new(CombKind::Whitespace(inner, ws))
}

/// Accept `inner`'s parsed integer only if it falls within `[lower, upper]`.
pub fn int_range(inner: P, lower: i64, upper: i64) -> P {
    Combinator::new(CombKind::IntRange(inner, lower, upper))
}

/// Parse `length` to obtain a byte count, then parse exactly that many
/// bytes with `value`.
pub fn length_value(length: P, value: P) -> P {
    Combinator::new(CombKind::LengthValue(length, value))
}
