use super::util;
use crate::error::{RingError, Result};

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    PathSegment,
    Query,
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

/// Reserved characters that may stay literal inside a path segment. A query
/// component escapes every reserved character.
fn is_safe(b: u8, component: Component) -> bool {
    if is_unreserved(b) {
        return true;
    }
    match component {
        Component::PathSegment => matches!(b, b'$' | b'&' | b'+' | b':' | b'=' | b'@'),
        Component::Query => false,
    }
}

fn escape(input: &[u8], component: Component) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for &b in input {
        if is_safe(b, component) {
            out.push(b);
        } else if b == b' ' && component == Component::Query {
            out.push(b'+');
        } else {
            out.extend_from_slice(&[b'%', HEX_UPPER[(b >> 4) as usize], HEX_UPPER[(b & 0x0F) as usize]]);
        }
    }
    out
}

fn unescape(input: &[u8], component: Component) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'%' => {
                let pair = input
                    .get(i + 1..i + 3)
                    .and_then(|h| Some((util::hex_value(h[0])?, util::hex_value(h[1])?)));
                match pair {
                    Some((hi, lo)) => out.push(hi << 4 | lo),
                    None => {
                        let end = (i + 3).min(input.len());
                        return Err(RingError::invalid_escape(&input[i..end]));
                    }
                }
                i += 3;
            }
            b'+' if component == Component::Query => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Ok(out)
}

pub fn encode_path(input: &[u8]) -> Result<Vec<u8>> {
    Ok(escape(input, Component::PathSegment))
}

pub fn decode_path(input: &[u8]) -> Result<Vec<u8>> {
    unescape(input, Component::PathSegment)
}

pub fn encode_query(input: &[u8]) -> Result<Vec<u8>> {
    Ok(escape(input, Component::Query))
}

pub fn decode_query(input: &[u8]) -> Result<Vec<u8>> {
    unescape(input, Component::Query)
}
