//! IEEE-754 bit patterns as hex words.
//!
//! Both directions work on whitespace-separated tokens and print every output
//! token followed by one space, including the last.

use half::f16;

use super::util;
use crate::error::{RingError, Result};

fn tokens(input: &[u8]) -> Vec<String> {
    util::string_lossy(input)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn parse_hex_word(token: &str, bits: u32) -> Result<u32> {
    if token.starts_with('+') {
        return Err(RingError::invalid_number(token, "invalid syntax"));
    }
    let value = u32::from_str_radix(token, 16).map_err(|e| {
        let reason = match e.kind() {
            std::num::IntErrorKind::PosOverflow => "value out of range",
            _ => "invalid syntax",
        };
        RingError::invalid_number(token, reason)
    })?;
    if bits < 32 && value >> bits != 0 {
        return Err(RingError::invalid_number(token, "value out of range"));
    }
    Ok(value)
}

fn out_of_range(token: &str) -> RingError {
    RingError::invalid_number(token, "value out of range")
}

/// Rounds `mant * 2^exp` to binary32, nearest even. `sticky` marks nonzero
/// bits already dropped below `mant`.
fn round_to_f32(token: &str, negative: bool, mant: u64, exp: i64, sticky: bool) -> Result<f32> {
    let sign = if negative { 0x8000_0000u32 } else { 0 };
    if mant == 0 {
        return Ok(f32::from_bits(sign));
    }

    let top = exp + 63 - mant.leading_zeros() as i64;
    let mut lsb = (top - 23).max(-149);
    let shift = lsb - exp;
    let mut kept = if shift <= 0 {
        mant << -shift
    } else if shift >= 128 {
        0
    } else {
        let wide = mant as u128;
        let kept = (wide >> shift) as u64;
        let rest = wide & ((1u128 << shift) - 1);
        let half = 1u128 << (shift - 1);
        let round_up = rest > half || (rest == half && (sticky || kept & 1 == 1));
        kept + round_up as u64
    };

    if kept >> 24 != 0 {
        kept >>= 1;
        lsb += 1;
    }
    if kept == 0 {
        return Ok(f32::from_bits(sign));
    }
    if kept < 1 << 23 {
        return Ok(f32::from_bits(sign | kept as u32));
    }
    let biased = lsb + 150;
    if biased >= 255 {
        return Err(out_of_range(token));
    }
    Ok(f32::from_bits(sign | (biased as u32) << 23 | (kept as u32 & 0x7F_FFFF)))
}

/// Hexadecimal literal such as `0x1.8p1`: hex digits with an optional point,
/// then a mandatory binary exponent.
fn parse_hex_float(token: &str, body: &str, negative: bool) -> Result<f32> {
    let syntax = || RingError::invalid_number(token, "invalid syntax");
    let (mantissa, exponent) = body.split_once(['p', 'P']).ok_or_else(syntax)?;

    let mut mant: u64 = 0;
    let mut exp: i64 = 0;
    let mut sticky = false;
    let mut digits = 0;
    let mut seen_point = false;
    for c in mantissa.chars() {
        if c == '.' && !seen_point {
            seen_point = true;
            continue;
        }
        let d = c.to_digit(16).ok_or_else(syntax)? as u64;
        digits += 1;
        if mant >> 60 == 0 {
            mant = mant << 4 | d;
            if seen_point {
                exp -= 4;
            }
        } else {
            sticky |= d != 0;
            if !seen_point {
                exp += 4;
            }
        }
    }
    if digits == 0 {
        return Err(syntax());
    }

    let (exp_negative, exp_digits) = match exponent.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, exponent.strip_prefix('+').unwrap_or(exponent)),
    };
    if exp_digits.is_empty() || !exp_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(syntax());
    }
    let magnitude = exp_digits
        .bytes()
        .fold(0i64, |acc, b| (acc * 10 + (b - b'0') as i64).min(1_000_000));
    exp += if exp_negative { -magnitude } else { magnitude };

    round_to_f32(token, negative, mant, exp, sticky)
}

/// Parses straight to binary32 so rounding happens once. A finite literal
/// too large for binary32 is an error rather than infinity.
fn parse_float(token: &str) -> Result<f32> {
    let (negative, unsigned) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    if let Some(body) = unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
        return parse_hex_float(token, body, negative);
    }

    let value: f32 = token
        .parse()
        .map_err(|_| RingError::invalid_number(token, "invalid syntax"))?;
    if value.is_infinite() {
        let spelled = token.trim_start_matches(['+', '-']).to_ascii_lowercase();
        if !spelled.starts_with("inf") {
            return Err(out_of_range(token));
        }
    }
    Ok(value)
}

/// Shortest round-trip digits laid out like C's `%g`: exponent form when the
/// decimal exponent is below -4 or at least 6.
pub(crate) fn format_general(value: f32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if !(-4..6).contains(&exp) {
        let mut s = digits[..1].to_string();
        if digits.len() > 1 {
            s.push('.');
            s.push_str(&digits[1..]);
        }
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", s, exp_sign, exp.abs())
    } else if exp >= 0 {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            format!("{}{}", digits, "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    } else {
        format!("0.{}{}", "0".repeat((-exp - 1) as usize), digits)
    };

    format!("{}{}", sign, body)
}

fn join_tokens(words: impl Iterator<Item = String>) -> Vec<u8> {
    let mut out = String::new();
    for word in words {
        out.push_str(&word);
        out.push(' ');
    }
    out.into_bytes()
}

pub fn decode_f32(input: &[u8]) -> Result<Vec<u8>> {
    let words = tokens(input)
        .iter()
        .map(|t| parse_hex_word(t, 32).map(|bits| format_general(f32::from_bits(bits))))
        .collect::<Result<Vec<_>>>()?;
    Ok(join_tokens(words.into_iter()))
}

pub fn encode_f32(input: &[u8]) -> Result<Vec<u8>> {
    let words = tokens(input)
        .iter()
        .map(|t| parse_float(t).map(|v| format!("{:08X}", v.to_bits())))
        .collect::<Result<Vec<_>>>()?;
    Ok(join_tokens(words.into_iter()))
}

pub fn decode_f16(input: &[u8]) -> Result<Vec<u8>> {
    let words = tokens(input)
        .iter()
        .map(|t| {
            parse_hex_word(t, 16)
                .map(|bits| format_general(f16::from_bits(bits as u16).to_f32()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(join_tokens(words.into_iter()))
}

/// Narrowing goes decimal -> binary32 -> binary16, rounding to nearest even.
pub fn encode_f16(input: &[u8]) -> Result<Vec<u8>> {
    let words = tokens(input)
        .iter()
        .map(|t| parse_float(t).map(|v| format!("{:04X}", f16::from_f32(v).to_bits())))
        .collect::<Result<Vec<_>>>()?;
    Ok(join_tokens(words.into_iter()))
}
