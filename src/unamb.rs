//! The unambiguous text writer (`write_result_unamb`), used throughout the
//! test suite to render a [`Token`] tree as a compact, total ASCII form.
//!
//! Grammar (see SPEC_FULL.md §6.4):
//!   - `null` for `TokenKind::None`, `ERR` for `TokenKind::Err`.
//!   - `<HH.HH.HH>` for non-empty `Bytes` (lower-case hex, dot-separated),
//!     `<>` for empty `Bytes`.
//!   - `s0xHEX` / `s-0xHEX` for signed ints; `u0xHEX` for unsigned.
//!   - `d%a` / `f%a` for floats, using the C99 `%a` hex-float form.
//!   - `( child … )` space-separated for `Sequence`.
//!   - `{user:<type_id> <hex payload>}` for user tokens without a
//!     registered writer, or the registered writer's own output otherwise.

use crate::token::{unamb_writer_for, Token, TokenKind};
use std::fmt::Write;

/// Render `token` in the unambiguous text form. Total over any well-formed
/// `Token` tree: unregistered user types fall back to a generic form rather
/// than panicking.
pub fn write_result_unamb(token: &Token<'_>) -> String {
    let mut out = String::new();
    write_token(token, &mut out).expect("writing to a String never fails");
    out
}

fn write_token(token: &Token<'_>, out: &mut String) -> std::fmt::Result {
    match &token.kind {
        TokenKind::None => write!(out, "null"),
        TokenKind::Err => write!(out, "ERR"),
        TokenKind::Bytes(bytes) => write_bytes(bytes, out),
        TokenKind::SInt(v) => {
            if *v < 0 {
                write!(out, "s-0x{:x}", v.unsigned_abs())
            } else {
                write!(out, "s0x{:x}", v)
            }
        }
        TokenKind::UInt(v) => write!(out, "u0x{:x}", v),
        TokenKind::Double(v) => write!(out, "d{}", hex_float(*v)),
        TokenKind::Float(v) => write!(out, "f{}", hex_float(*v as f64)),
        TokenKind::Sequence(arr) => {
            write!(out, "(")?;
            for (i, child) in arr.as_slice().iter().enumerate() {
                if i > 0 {
                    write!(out, " ")?;
                }
                write_token(child, out)?;
            }
            write!(out, ")")
        }
        TokenKind::User { type_id, payload } => write_user(*type_id, payload, out),
    }
}

fn write_bytes(bytes: &[u8], out: &mut String) -> std::fmt::Result {
    write!(out, "<")?;
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            write!(out, ".")?;
        }
        write!(out, "{:02x}", b)?;
    }
    write!(out, ">")
}

fn write_user(type_id: u32, payload: &[u8], out: &mut String) -> std::fmt::Result {
    if let Some(writer) = unamb_writer_for(type_id) {
        write!(out, "{{")?;
        writer(payload, out)?;
        write!(out, "}}")
    } else {
        write!(out, "{{user:{} ", type_id)?;
        for (i, b) in payload.iter().enumerate() {
            if i > 0 {
                write!(out, ".")?;
            }
            write!(out, "{:02x}", b)?;
        }
        write!(out, "}}")
    }
}

/// C99 `%a`-style hex float rendering: `0x1.fpN` (or `0x0p0` for zero).
fn hex_float(v: f64) -> String {
    if v == 0.0 {
        return if v.is_sign_negative() {
            "-0x0p0".to_string()
        } else {
            "0x0p0".to_string()
        };
    }
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v < 0.0 { "-inf".to_string() } else { "inf".to_string() };
    }
    let bits = v.to_bits();
    let sign = if bits >> 63 == 1 { "-" } else { "" };
    let exp = ((bits >> 52) & 0x7ff) as i64 - 1023;
    let mantissa = bits & 0x000f_ffff_ffff_ffff;
    if mantissa == 0 {
        format!("{}0x1p{}", sign, exp)
    } else {
        // Drop trailing zero hex digits from the 13-nibble mantissa.
        let mut hex = format!("{:013x}", mantissa);
        while hex.ends_with('0') {
            hex.pop();
        }
        format!("{}0x1.{}p{}", sign, hex, exp)
    }
}
