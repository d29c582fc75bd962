//! Go string literal syntax: ASCII-only quoting and full unquoting of
//! double-quoted, single-quoted and raw (backtick) literals.

use super::util;
use crate::error::{RingError, Result};

const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";

fn push_hex(out: &mut Vec<u8>, value: u32, digits: u32) {
    for shift in (0..digits).rev() {
        out.push(HEX_LOWER[((value >> (shift * 4)) & 0xF) as usize]);
    }
}

pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len() + 2);
    out.push(b'"');
    for chunk in input.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '"' | '\\' => out.extend_from_slice(&[b'\\', c as u8]),
                ' '..='~' => out.push(c as u8),
                '\u{07}' => out.extend_from_slice(b"\\a"),
                '\u{08}' => out.extend_from_slice(b"\\b"),
                '\u{0C}' => out.extend_from_slice(b"\\f"),
                '\n' => out.extend_from_slice(b"\\n"),
                '\r' => out.extend_from_slice(b"\\r"),
                '\t' => out.extend_from_slice(b"\\t"),
                '\u{0B}' => out.extend_from_slice(b"\\v"),
                '\0'..='\u{1F}' | '\u{7F}' => {
                    out.extend_from_slice(b"\\x");
                    push_hex(&mut out, c as u32, 2);
                }
                '\u{80}'..='\u{FFFF}' => {
                    out.extend_from_slice(b"\\u");
                    push_hex(&mut out, c as u32, 4);
                }
                _ => {
                    out.extend_from_slice(b"\\U");
                    push_hex(&mut out, c as u32, 8);
                }
            }
        }
        for &b in chunk.invalid() {
            out.extend_from_slice(b"\\x");
            push_hex(&mut out, b as u32, 2);
        }
    }
    out.push(b'"');
    Ok(out)
}

/// Input that does not already start with a quote character is treated as
/// the body of a double-quoted literal.
pub fn wrap_bare(input: &[u8]) -> Vec<u8> {
    match input.first() {
        Some(b'"' | b'`' | b'\'') | None => input.to_vec(),
        Some(_) => {
            let mut wrapped = Vec::with_capacity(input.len() + 2);
            wrapped.push(b'"');
            wrapped.extend_from_slice(input);
            wrapped.push(b'"');
            wrapped
        }
    }
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    unquote(&wrap_bare(input))
}

fn syntax_error() -> RingError {
    RingError::invalid_input("invalid Go string literal syntax")
}

/// Reads one escape sequence after the backslash. `\x` and octal escapes
/// produce a raw byte; `\u` and `\U` produce UTF-8.
fn unescape(rest: &[u8], quote: u8, out: &mut Vec<u8>) -> Result<usize> {
    let (&kind, rest) = rest.split_first().ok_or_else(syntax_error)?;
    let simple = match kind {
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'v' => Some(0x0B),
        b'\\' => Some(b'\\'),
        b'\'' | b'"' if kind == quote => Some(kind),
        _ => None,
    };
    if let Some(b) = simple {
        out.push(b);
        return Ok(1);
    }

    match kind {
        b'x' | b'u' | b'U' => {
            let n = match kind {
                b'x' => 2,
                b'u' => 4,
                _ => 8,
            };
            let digits = rest.get(..n).ok_or_else(syntax_error)?;
            let mut value: u32 = 0;
            for &d in digits {
                value = value << 4 | util::hex_value(d).ok_or_else(syntax_error)? as u32;
            }
            if kind == b'x' {
                out.push(value as u8);
            } else {
                let c = char::from_u32(value).ok_or_else(syntax_error)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Ok(1 + n)
        }
        b'0'..=b'7' => {
            let digits = rest.get(..2).ok_or_else(syntax_error)?;
            let mut value = (kind - b'0') as u32;
            for &d in digits {
                if !(b'0'..=b'7').contains(&d) {
                    return Err(syntax_error());
                }
                value = value << 3 | (d - b'0') as u32;
            }
            if value > 255 {
                return Err(syntax_error());
            }
            out.push(value as u8);
            Ok(3)
        }
        _ => Err(syntax_error()),
    }
}

/// Reads one character of a quoted body, returning the bytes consumed.
fn unquote_char(body: &[u8], quote: u8, out: &mut Vec<u8>) -> Result<usize> {
    match body[0] {
        b'\n' => Err(syntax_error()),
        b'\\' => unescape(&body[1..], quote, out).map(|n| n + 1),
        b if b < 0x80 => {
            out.push(b);
            Ok(1)
        }
        _ => {
            let chunk = body.utf8_chunks().next().ok_or_else(syntax_error)?;
            match chunk.valid().chars().next() {
                Some(c) => {
                    out.extend_from_slice(&body[..c.len_utf8()]);
                    Ok(c.len_utf8())
                }
                None => {
                    out.extend_from_slice("\u{FFFD}".as_bytes());
                    Ok(1)
                }
            }
        }
    }
}

pub fn unquote(input: &[u8]) -> Result<Vec<u8>> {
    let (&quote, rest) = input.split_first().ok_or_else(syntax_error)?;

    match quote {
        b'`' => {
            let end = rest.iter().position(|&b| b == b'`').ok_or_else(syntax_error)?;
            if end + 1 != rest.len() {
                return Err(syntax_error());
            }
            Ok(rest[..end].iter().copied().filter(|&b| b != b'\r').collect())
        }
        b'"' | b'\'' => {
            let mut out = Vec::with_capacity(rest.len());
            let mut i = 0;
            let mut chars = 0;
            while i < rest.len() && rest[i] != quote {
                if quote == b'\'' && chars == 1 {
                    break;
                }
                i += unquote_char(&rest[i..], quote, &mut out)?;
                chars += 1;
            }
            if quote == b'\'' && chars != 1 {
                return Err(syntax_error());
            }
            if i + 1 != rest.len() || rest[i] != quote {
                return Err(syntax_error());
            }
            Ok(out)
        }
        _ => Err(syntax_error()),
    }
}
