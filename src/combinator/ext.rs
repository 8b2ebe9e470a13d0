//! Fluent wrapping for combinator nodes, so grammars can be written as a
//! chain of method calls instead of nested free-function application.

use super::{build, P};
use crate::arena::Arena;
use crate::token::Token;

pub trait CombinatorExt {
    fn optional(self) -> P;
    fn ignore(self) -> P;
    fn many(self) -> P;
    fn many1(self) -> P;
    fn repeat_n(self, n: usize) -> P;
    fn sep_by(self, sep: P) -> P;
    fn sep_by1(self, sep: P) -> P;
    fn butnot(self, exclude: P) -> P;
    fn and_also(self) -> P;
    fn not_followed_by(self) -> P;
    fn action<F>(self, f: F) -> P
    where
        F: for<'a> Fn(Token<'a>, &'a Arena) -> Token<'a> + 'static;
    fn attr_bool<F>(self, f: F) -> P
    where
        F: for<'a> Fn(&Token<'a>) -> bool + 'static;
    fn bind<F>(self, f: F) -> P
    where
        F: for<'a> Fn(&Token<'a>, &'a Arena) -> Option<P> + 'static;
    fn put_value(self, name: &'static str) -> P;
    fn int_range(self, lower: i64, upper: i64) -> P;
}

impl CombinatorExt for P {
    fn optional(self) -> P {
        build::optional(self)
    }
    fn ignore(self) -> P {
        build::ignore(self)
    }
    fn many(self) -> P {
        build::many(self)
    }
    fn many1(self) -> P {
        build::many1(self)
    }
    fn repeat_n(self, n: usize) -> P {
        build::repeat_n(self, n)
    }
    fn sep_by(self, sep: P) -> P {
        build::sep_by(self, sep)
    }
    fn sep_by1(self, sep: P) -> P {
        build::sep_by1(self, sep)
    }
    fn butnot(self, exclude: P) -> P {
        build::butnot(self, exclude)
    }
    fn and_also(self) -> P {
        build::and(self)
    }
    fn not_followed_by(self) -> P {
        build::not(self)
    }
    fn action<F>(self, f: F) -> P
    where
        F: for<'a> Fn(Token<'a>, &'a Arena) -> Token<'a> + 'static,
    {
        build::action(self, f)
    }
    fn attr_bool<F>(self, f: F) -> P
    where
        F: for<'a> Fn(&Token<'a>) -> bool + 'static,
    {
        build::attr_bool(self, f)
    }
    fn bind<F>(self, f: F) -> P
    where
        F: for<'a> Fn(&Token<'a>, &'a Arena) -> Option<P> + 'static,
    {
        build::bind(self, f)
    }
    fn put_value(self, name: &'static str) -> P {
        build::put_value(self, name)
    }
    fn int_range(self, lower: i64, upper: i64) -> P {
        build::int_range(self, lower, upper)
    }
}
